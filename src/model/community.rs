//! Community domain models and parameters.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use sea_orm::DbErr;
use serde::Serialize;

use crate::error::AppError;

/// Visibility and admission policy of a community.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PrivacyLevel {
    /// Anyone may join directly.
    Public,
    /// Direct joins require the `premium_user` role.
    Private,
    /// Members join only by accepting an invitation.
    InvitationOnly,
}

impl PrivacyLevel {
    pub const ALL: [PrivacyLevel; 3] = [Self::Public, Self::Private, Self::InvitationOnly];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
            Self::InvitationOnly => "invitation_only",
        }
    }
}

impl fmt::Display for PrivacyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrivacyLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "public" => Ok(Self::Public),
            "private" => Ok(Self::Private),
            "invitation_only" => Ok(Self::InvitationOnly),
            other => Err(AppError::Validation(format!(
                "Invalid privacy level: {}",
                other
            ))),
        }
    }
}

/// Community with its counters and privacy level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Community {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: i32,
    pub privacy_level: PrivacyLevel,
    /// Members that have ever joined.
    pub total_count: i32,
    /// Members currently active.
    pub active_count: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Community {
    /// Converts an entity model to a community domain model at the repository boundary.
    ///
    /// # Arguments
    /// - `entity` - The entity model from the database
    ///
    /// # Returns
    /// - `Ok(Community)` - The converted community
    /// - `Err(DbErr::Custom)` - Stored privacy level is not a known value
    pub fn from_entity(entity: entity::community::Model) -> Result<Self, DbErr> {
        let privacy_level = entity.privacy_level.parse::<PrivacyLevel>().map_err(|_| {
            DbErr::Custom(format!(
                "Community {} has unknown privacy level '{}'",
                entity.id, entity.privacy_level
            ))
        })?;

        Ok(Self {
            id: entity.id,
            name: entity.name,
            description: entity.description,
            owner_id: entity.owner_id,
            privacy_level,
            total_count: entity.total_count,
            active_count: entity.active_count,
            is_active: entity.is_active,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }
}

/// Parameters for creating a community.
#[derive(Debug, Clone)]
pub struct CreateCommunityParams {
    pub name: String,
    pub description: Option<String>,
    pub owner_id: i32,
    pub privacy_level: PrivacyLevel,
}

/// Parameters for updating a community's descriptive fields.
///
/// `None` leaves a field unchanged. Privacy and ownership have their own operations.
#[derive(Debug, Clone, Default)]
pub struct UpdateCommunityParams {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

/// Filters for searching communities by name or description.
#[derive(Debug, Clone)]
pub struct CommunitySearchParams {
    pub query: String,
    pub privacy_level: Option<PrivacyLevel>,
    pub active_only: bool,
    /// Zero-based page index.
    pub page: u64,
    pub per_page: u64,
}

/// Paginated communities with metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaginatedCommunities {
    pub communities: Vec<Community>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
}
