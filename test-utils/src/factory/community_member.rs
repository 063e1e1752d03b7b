//! Community member factory for creating membership rows.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating membership rows in one of the three stored states.
///
/// The default row is an active `member` that joined now. `invited()` and
/// `inactive()` switch to the pending-invitation and former-member shapes.
///
/// # Example
///
/// ```rust,ignore
/// let invite = CommunityMemberFactory::new(&db, community.id, user.id)
///     .invited(owner.id)
///     .build()
///     .await?;
/// ```
pub struct CommunityMemberFactory<'a> {
    db: &'a DatabaseConnection,
    entity: entity::community_member::Model,
}

impl<'a> CommunityMemberFactory<'a> {
    /// Creates a new factory for an active `member` row.
    ///
    /// # Arguments
    /// - `db` - Database connection for inserting the entity
    /// - `community_id` - Community the row belongs to
    /// - `user_id` - User the row belongs to
    pub fn new(db: &'a DatabaseConnection, community_id: i32, user_id: i32) -> Self {
        let now = Utc::now();
        Self {
            db,
            entity: entity::community_member::Model {
                community_id,
                user_id,
                role: "member".to_string(),
                is_active: true,
                joined_at: Some(now),
                role_assigned_at: Some(now),
                role_assigned_by: None,
                created_at: now,
            },
        }
    }

    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.entity.role = role.into();
        self
    }

    pub fn assigned_by(mut self, user_id: i32) -> Self {
        self.entity.role_assigned_by = Some(user_id);
        self
    }

    /// Shapes the row as a pending invitation from `inviter_id`.
    pub fn invited(mut self, inviter_id: i32) -> Self {
        self.entity.is_active = false;
        self.entity.joined_at = None;
        self.entity.role_assigned_at = None;
        self.entity.role_assigned_by = Some(inviter_id);
        self
    }

    /// Shapes the row as a former member who left or was removed.
    pub fn inactive(mut self) -> Self {
        self.entity.is_active = false;
        self
    }

    /// Builds and inserts the membership row.
    ///
    /// # Returns
    /// - `Ok(entity::community_member::Model)` - Created row
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::community_member::Model, DbErr> {
        let entity = self.entity;
        entity::community_member::ActiveModel {
            community_id: ActiveValue::Set(entity.community_id),
            user_id: ActiveValue::Set(entity.user_id),
            role: ActiveValue::Set(entity.role),
            is_active: ActiveValue::Set(entity.is_active),
            joined_at: ActiveValue::Set(entity.joined_at),
            role_assigned_at: ActiveValue::Set(entity.role_assigned_at),
            role_assigned_by: ActiveValue::Set(entity.role_assigned_by),
            created_at: ActiveValue::Set(entity.created_at),
        }
        .insert(self.db)
        .await
    }
}

/// Creates an active `member` row.
pub async fn create_member(
    db: &DatabaseConnection,
    community_id: i32,
    user_id: i32,
) -> Result<entity::community_member::Model, DbErr> {
    CommunityMemberFactory::new(db, community_id, user_id)
        .build()
        .await
}
