//! Community membership data repository.

use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::model::member::{CommunityMember, CommunityRole, MemberStats};

/// Fields of a membership row to insert.
#[derive(Debug, Clone)]
pub struct NewMember {
    pub community_id: i32,
    pub user_id: i32,
    pub role: CommunityRole,
    pub is_active: bool,
    pub joined_at: Option<DateTime<Utc>>,
    pub role_assigned_at: Option<DateTime<Utc>>,
    pub role_assigned_by: Option<i32>,
}

/// Repository providing database operations for community membership rows.
pub struct CommunityMemberRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> CommunityMemberRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Gets the membership row of a user in a community.
    ///
    /// # Returns
    /// - `Ok(Some(CommunityMember))` - Row found, in any state
    /// - `Ok(None)` - The user has no row in the community
    /// - `Err(DbErr)` - Database error or unreadable stored role
    pub async fn get(
        &self,
        community_id: i32,
        user_id: i32,
    ) -> Result<Option<CommunityMember>, DbErr> {
        entity::prelude::CommunityMember::find_by_id((community_id, user_id))
            .one(self.db)
            .await?
            .map(CommunityMember::from_entity)
            .transpose()
    }

    /// Inserts a membership row.
    ///
    /// # Returns
    /// - `Ok(CommunityMember)` - The created row
    /// - `Err(DbErr)` - Database error, including an existing row for the same pair
    pub async fn create(&self, member: NewMember) -> Result<CommunityMember, DbErr> {
        let entity = entity::community_member::ActiveModel {
            community_id: ActiveValue::Set(member.community_id),
            user_id: ActiveValue::Set(member.user_id),
            role: ActiveValue::Set(member.role.as_str().to_string()),
            is_active: ActiveValue::Set(member.is_active),
            joined_at: ActiveValue::Set(member.joined_at),
            role_assigned_at: ActiveValue::Set(member.role_assigned_at),
            role_assigned_by: ActiveValue::Set(member.role_assigned_by),
            created_at: ActiveValue::Set(Utc::now()),
        }
        .insert(self.db)
        .await?;

        CommunityMember::from_entity(entity)
    }

    /// Writes every mutable field of `member` if the stored row still has
    /// `is_active == expected_active`.
    ///
    /// # Arguments
    /// - `expected_active` - Active flag read earlier in the transaction
    /// - `member` - Row with the new role, flags and timestamps
    ///
    /// # Returns
    /// - `Ok(true)` - Row updated
    /// - `Ok(false)` - Row missing or its active flag changed since it was read
    /// - `Err(DbErr)` - Database error during update
    pub async fn save(&self, expected_active: bool, member: &CommunityMember) -> Result<bool, DbErr> {
        let result = entity::prelude::CommunityMember::update_many()
            .col_expr(
                entity::community_member::Column::Role,
                Expr::value(member.role.as_str()),
            )
            .col_expr(
                entity::community_member::Column::IsActive,
                Expr::value(member.is_active),
            )
            .col_expr(
                entity::community_member::Column::JoinedAt,
                Expr::value(member.joined_at),
            )
            .col_expr(
                entity::community_member::Column::RoleAssignedAt,
                Expr::value(member.role_assigned_at),
            )
            .col_expr(
                entity::community_member::Column::RoleAssignedBy,
                Expr::value(member.role_assigned_by),
            )
            .filter(entity::community_member::Column::CommunityId.eq(member.community_id))
            .filter(entity::community_member::Column::UserId.eq(member.user_id))
            .filter(entity::community_member::Column::IsActive.eq(expected_active))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }

    /// Deletes a membership row that is not active.
    ///
    /// # Returns
    /// - `Ok(true)` - Row deleted
    /// - `Ok(false)` - Row missing or active
    pub async fn delete_inactive(&self, community_id: i32, user_id: i32) -> Result<bool, DbErr> {
        let result = entity::prelude::CommunityMember::delete_many()
            .filter(entity::community_member::Column::CommunityId.eq(community_id))
            .filter(entity::community_member::Column::UserId.eq(user_id))
            .filter(entity::community_member::Column::IsActive.eq(false))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }

    /// Gets the members of a community ordered by user id.
    ///
    /// # Arguments
    /// - `community_id` - Community to list
    /// - `role` - Optional role filter
    /// - `active_only` - Only active rows
    pub async fn get_members(
        &self,
        community_id: i32,
        role: Option<CommunityRole>,
        active_only: bool,
    ) -> Result<Vec<CommunityMember>, DbErr> {
        let mut query = entity::prelude::CommunityMember::find()
            .filter(entity::community_member::Column::CommunityId.eq(community_id));

        if let Some(role) = role {
            query = query.filter(entity::community_member::Column::Role.eq(role.as_str()));
        }
        if active_only {
            query = query.filter(entity::community_member::Column::IsActive.eq(true));
        }

        query
            .order_by_asc(entity::community_member::Column::UserId)
            .all(self.db)
            .await?
            .into_iter()
            .map(CommunityMember::from_entity)
            .collect()
    }

    /// Gets the user ids of active members holding `role`.
    pub async fn get_user_ids_by_role(
        &self,
        community_id: i32,
        role: CommunityRole,
    ) -> Result<Vec<i32>, DbErr> {
        entity::prelude::CommunityMember::find()
            .select_only()
            .column(entity::community_member::Column::UserId)
            .filter(entity::community_member::Column::CommunityId.eq(community_id))
            .filter(entity::community_member::Column::Role.eq(role.as_str()))
            .filter(entity::community_member::Column::IsActive.eq(true))
            .order_by_asc(entity::community_member::Column::UserId)
            .into_tuple::<i32>()
            .all(self.db)
            .await
    }

    /// Gets the other membership rows whose role was last assigned by `assigner_id`.
    pub async fn get_assigned_by(
        &self,
        community_id: i32,
        assigner_id: i32,
    ) -> Result<Vec<CommunityMember>, DbErr> {
        entity::prelude::CommunityMember::find()
            .filter(entity::community_member::Column::CommunityId.eq(community_id))
            .filter(entity::community_member::Column::RoleAssignedBy.eq(assigner_id))
            .filter(entity::community_member::Column::UserId.ne(assigner_id))
            .order_by_asc(entity::community_member::Column::UserId)
            .all(self.db)
            .await?
            .into_iter()
            .map(CommunityMember::from_entity)
            .collect()
    }

    /// Aggregates a community's membership rows.
    ///
    /// `total_members` counts rows that have joined at some point, matching the
    /// community's `total_count`. `active_members` matches `active_count`.
    pub async fn get_member_stats(&self, community_id: i32) -> Result<MemberStats, DbErr> {
        let rows = || {
            entity::prelude::CommunityMember::find()
                .filter(entity::community_member::Column::CommunityId.eq(community_id))
        };

        let total_members = rows()
            .filter(entity::community_member::Column::JoinedAt.is_not_null())
            .count(self.db)
            .await?;
        let active_members = rows()
            .filter(entity::community_member::Column::IsActive.eq(true))
            .count(self.db)
            .await?;
        let pending_invitations = self.count_pending(community_id).await?;

        Ok(MemberStats {
            total_members,
            active_members,
            pending_invitations,
        })
    }

    /// Counts invitations that have been neither approved nor rejected.
    pub async fn count_pending(&self, community_id: i32) -> Result<u64, DbErr> {
        entity::prelude::CommunityMember::find()
            .filter(entity::community_member::Column::CommunityId.eq(community_id))
            .filter(entity::community_member::Column::IsActive.eq(false))
            .filter(entity::community_member::Column::RoleAssignedAt.is_null())
            .count(self.db)
            .await
    }

    /// Checks whether a user is an active admin or moderator in both communities.
    ///
    /// # Returns
    /// - `Ok(true)` - At least one such user exists
    /// - `Ok(false)` - No staff member is shared
    pub async fn has_shared_staff(&self, community_id: i32, other_id: i32) -> Result<bool, DbErr> {
        let staff_roles = [CommunityRole::Admin.as_str(), CommunityRole::Moderator.as_str()];

        let staff = entity::prelude::CommunityMember::find()
            .select_only()
            .column(entity::community_member::Column::UserId)
            .filter(entity::community_member::Column::CommunityId.eq(community_id))
            .filter(entity::community_member::Column::IsActive.eq(true))
            .filter(entity::community_member::Column::Role.is_in(staff_roles))
            .into_tuple::<i32>()
            .all(self.db)
            .await?;

        if staff.is_empty() {
            return Ok(false);
        }

        let shared = entity::prelude::CommunityMember::find()
            .filter(entity::community_member::Column::CommunityId.eq(other_id))
            .filter(entity::community_member::Column::IsActive.eq(true))
            .filter(entity::community_member::Column::Role.is_in(staff_roles))
            .filter(entity::community_member::Column::UserId.is_in(staff))
            .count(self.db)
            .await?;

        Ok(shared > 0)
    }
}
