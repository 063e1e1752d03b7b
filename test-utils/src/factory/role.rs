//! Role factory for creating global roles and granting them to users.

use crate::factory::helpers::next_id;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test roles.
///
/// # Example
///
/// ```rust,ignore
/// let role = RoleFactory::new(&db).name("premium_user").build().await?;
/// ```
pub struct RoleFactory<'a> {
    db: &'a DatabaseConnection,
    name: String,
    is_active: bool,
}

impl<'a> RoleFactory<'a> {
    /// Creates a new RoleFactory.
    ///
    /// Defaults:
    /// - name: `"role_{id}"`
    /// - is_active: `true`
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self {
            db,
            name: format!("role_{}", next_id()),
            is_active: true,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    /// Builds and inserts the role.
    ///
    /// # Returns
    /// - `Ok(entity::role::Model)` - Created role
    /// - `Err(DbErr)` - Database error during insert, including a duplicate name
    pub async fn build(self) -> Result<entity::role::Model, DbErr> {
        entity::role::ActiveModel {
            name: ActiveValue::Set(self.name),
            is_active: ActiveValue::Set(self.is_active),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates an active role with the given name.
pub async fn create_role(
    db: &DatabaseConnection,
    name: impl Into<String>,
) -> Result<entity::role::Model, DbErr> {
    RoleFactory::new(db).name(name).build().await
}

/// Grants a role to a user.
///
/// # Arguments
/// - `db` - Database connection
/// - `user_id` - User receiving the role
/// - `role_id` - Role being granted
///
/// # Returns
/// - `Ok(entity::user_role::Model)` - Created grant
/// - `Err(DbErr)` - Database error, including a missing user or role
pub async fn grant_role(
    db: &DatabaseConnection,
    user_id: i32,
    role_id: i32,
) -> Result<entity::user_role::Model, DbErr> {
    entity::user_role::ActiveModel {
        user_id: ActiveValue::Set(user_id),
        role_id: ActiveValue::Set(role_id),
    }
    .insert(db)
    .await
}
