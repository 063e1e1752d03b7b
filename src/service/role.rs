//! Community role hierarchy and role assignment.

use chrono::Utc;
use sea_orm::ConnectionTrait;

use crate::{
    data::member::{CommunityMemberRepository, NewMember},
    error::{business::BusinessRuleError, AppError},
    model::{
        community::Community,
        member::{CommunityMember, CommunityRole, MembershipState},
    },
    service::{membership::CounterUpdate, quota::QuotaEnforcer},
};

/// Which community roles a holder of each role may hand out.
pub struct RoleHierarchy;

impl RoleHierarchy {
    /// Roles a holder of `role` may assign.
    pub fn assignable_by(role: CommunityRole) -> &'static [CommunityRole] {
        match role {
            CommunityRole::Owner => &[
                CommunityRole::Admin,
                CommunityRole::Moderator,
                CommunityRole::Member,
            ],
            CommunityRole::Admin => &[CommunityRole::Moderator, CommunityRole::Member],
            CommunityRole::Moderator => &[CommunityRole::Member],
            CommunityRole::Member => &[],
        }
    }

    /// Whether an assigner may give `target` to someone.
    ///
    /// The community owner may assign any role regardless of the table.
    pub fn can_assign(
        assigner_role: CommunityRole,
        target: CommunityRole,
        assigner_is_owner: bool,
    ) -> bool {
        assigner_is_owner || Self::assignable_by(assigner_role).contains(&target)
    }
}

/// Assigns community roles inside the caller's transaction.
pub struct RoleAssignment<'a, C: ConnectionTrait> {
    db: &'a C,
    quotas: &'a QuotaEnforcer,
}

impl<'a, C: ConnectionTrait> RoleAssignment<'a, C> {
    pub fn new(db: &'a C, quotas: &'a QuotaEnforcer) -> Self {
        Self { db, quotas }
    }

    /// Gives `role` to `user_id`, updating the existing membership row or creating an
    /// active one.
    ///
    /// With an assigner, the assigner must be an active member allowed to assign both
    /// the new role and the role the target currently holds. Without one the assignment
    /// is trusted. The owner role is never assigned here, and the current owner's role
    /// never changes here.
    ///
    /// # Returns
    /// - `Ok(CommunityMember)` - The row after the assignment
    /// - `Err(AppError::Validation)` - `role` is owner
    /// - `Err(AppError::AccessDenied)` - The assigner may not make this assignment
    /// - `Err(AppError::BusinessRule)` - The target is the community owner
    /// - `Err(AppError::QuotaExceeded)` - A new member would exceed the member limit
    /// - `Err(AppError::Concurrency)` - The row or counters changed underneath
    pub async fn assign(
        &self,
        community: &Community,
        user_id: i32,
        role: CommunityRole,
        assigner_id: Option<i32>,
    ) -> Result<CommunityMember, AppError> {
        let members = CommunityMemberRepository::new(self.db);

        if role == CommunityRole::Owner {
            return Err(AppError::Validation(
                "The owner role can only be assigned by transferring ownership".to_string(),
            ));
        }
        if user_id == community.owner_id {
            return Err(BusinessRuleError::OwnerRoleProtected {
                community_id: community.id,
                user_id,
            }
            .into());
        }

        let existing = members.get(community.id, user_id).await?;

        if let Some(assigner_id) = assigner_id {
            let assigner = members
                .get(community.id, assigner_id)
                .await?
                .filter(|member| member.is_active)
                .ok_or_else(|| {
                    AppError::access_denied(assigner_id, "not an active member of the community")
                })?;
            let is_owner = assigner_id == community.owner_id;

            if !RoleHierarchy::can_assign(assigner.role, role, is_owner) {
                return Err(AppError::access_denied(
                    assigner_id,
                    format!("{} cannot assign the {} role", assigner.role, role),
                ));
            }
            if let Some(current) = &existing {
                if !RoleHierarchy::can_assign(assigner.role, current.role, is_owner) {
                    return Err(AppError::access_denied(
                        assigner_id,
                        format!("{} cannot change the role of a {}", assigner.role, current.role),
                    ));
                }
            }
        }

        let now = Utc::now();

        let Some(mut member) = existing else {
            let owner_is_premium = self.quotas.owner_is_premium(self.db, community).await?;
            self.quotas
                .check_members(owner_is_premium, community.total_count as u64)?;
            let counts = CounterUpdate::new(community, 1, 1)?;

            let member = members
                .create(NewMember {
                    community_id: community.id,
                    user_id,
                    role,
                    is_active: true,
                    joined_at: Some(now),
                    role_assigned_at: Some(now),
                    role_assigned_by: assigner_id,
                })
                .await?;
            counts.apply(self.db).await?;

            tracing::info!(
                "Added user {} to community {} as {}",
                user_id,
                community.id,
                role
            );
            return Ok(member);
        };

        let was_active = member.is_active;
        member.role = role;
        member.role_assigned_by = assigner_id;
        if member.state() != MembershipState::Invited {
            member.role_assigned_at = Some(now);
        }

        if !members.save(was_active, &member).await? {
            return Err(AppError::Concurrency(format!(
                "membership of user {} in community {} changed during role assignment",
                user_id, community.id
            )));
        }

        tracing::info!(
            "Assigned role {} to user {} in community {}",
            role,
            user_id,
            community.id
        );

        Ok(member)
    }
}
