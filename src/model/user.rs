//! User domain model as seen by the community engine.

use serde::Serialize;

/// Global role granting premium features.
pub const PREMIUM_ROLE: &str = "premium_user";

/// User with the names of their active global roles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub is_active: bool,
    pub is_premium: bool,
    pub email_verified: bool,
    pub roles: Vec<String>,
}

impl User {
    /// Converts a user entity and its granted roles into the domain model.
    ///
    /// Inactive roles are dropped.
    pub fn from_entity(entity: entity::user::Model, roles: Vec<entity::role::Model>) -> Self {
        Self {
            id: entity.id,
            email: entity.email,
            is_active: entity.is_active,
            is_premium: entity.is_premium,
            email_verified: entity.email_verified,
            roles: roles
                .into_iter()
                .filter(|role| role.is_active)
                .map(|role| role.name)
                .collect(),
        }
    }

    pub fn has_role(&self, name: &str) -> bool {
        self.roles.iter().any(|role| role == name)
    }

    /// Whether the user holds the active `premium_user` role.
    pub fn has_premium_role(&self) -> bool {
        self.has_role(PREMIUM_ROLE)
    }

    /// Premium tier for quota purposes: the premium flag or the premium role.
    pub fn is_premium_tier(&self) -> bool {
        self.is_premium || self.has_premium_role()
    }
}
