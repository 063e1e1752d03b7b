//! Community factory for creating test community entities.

use crate::factory::helpers::next_id;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test communities.
///
/// Counters are stored exactly as set. The factory does not create the owner's
/// membership row; `helpers::create_community_with_owner` does both.
///
/// # Example
///
/// ```rust,ignore
/// let community = CommunityFactory::new(&db, owner.id)
///     .privacy_level("private")
///     .counts(1, 1)
///     .build()
///     .await?;
/// ```
pub struct CommunityFactory<'a> {
    db: &'a DatabaseConnection,
    owner_id: i32,
    name: String,
    description: Option<String>,
    privacy_level: String,
    total_count: i32,
    active_count: i32,
    is_active: bool,
}

impl<'a> CommunityFactory<'a> {
    /// Creates a new CommunityFactory.
    ///
    /// Defaults:
    /// - name: `"Community {id}"`
    /// - description: `None`
    /// - privacy_level: `"public"`
    /// - total_count / active_count: `0` / `0`
    /// - is_active: `true`
    ///
    /// # Arguments
    /// - `db` - Database connection for inserting the entity
    /// - `owner_id` - Id of an existing user owning the community
    pub fn new(db: &'a DatabaseConnection, owner_id: i32) -> Self {
        Self {
            db,
            owner_id,
            name: format!("Community {}", next_id()),
            description: None,
            privacy_level: "public".to_string(),
            total_count: 0,
            active_count: 0,
            is_active: true,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the stored privacy level (`"public"`, `"private"` or `"invitation_only"`).
    pub fn privacy_level(mut self, privacy_level: impl Into<String>) -> Self {
        self.privacy_level = privacy_level.into();
        self
    }

    /// Sets total and active member counters.
    pub fn counts(mut self, total_count: i32, active_count: i32) -> Self {
        self.total_count = total_count;
        self.active_count = active_count;
        self
    }

    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    /// Builds and inserts the community.
    ///
    /// # Returns
    /// - `Ok(entity::community::Model)` - Created community
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::community::Model, DbErr> {
        let now = Utc::now();
        entity::community::ActiveModel {
            name: ActiveValue::Set(self.name),
            description: ActiveValue::Set(self.description),
            owner_id: ActiveValue::Set(self.owner_id),
            privacy_level: ActiveValue::Set(self.privacy_level),
            total_count: ActiveValue::Set(self.total_count),
            active_count: ActiveValue::Set(self.active_count),
            is_active: ActiveValue::Set(self.is_active),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates a public, active community with zeroed counters.
pub async fn create_community(
    db: &DatabaseConnection,
    owner_id: i32,
) -> Result<entity::community::Model, DbErr> {
    CommunityFactory::new(db, owner_id).build().await
}
