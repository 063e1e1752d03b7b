//! Relationship domain models.

use std::str::FromStr;

use serde::Serialize;

use crate::{error::AppError, model::community::PrivacyLevel};

/// Relationship action requested through the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationshipAction {
    Add,
    Remove,
}

impl FromStr for RelationshipAction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "add" => Ok(Self::Add),
            "remove" => Ok(Self::Remove),
            other => Err(AppError::Validation(format!(
                "Invalid relationship action: {}",
                other
            ))),
        }
    }
}

/// Community reached from a root by following relationships.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InheritedRelationship {
    pub community_id: i32,
    pub name: String,
    /// Ids from the root down to the community this one was reached through.
    pub inheritance_path: Vec<i32>,
    pub privacy_level: PrivacyLevel,
    pub is_active: bool,
}

/// Result of checking whether an edge can be removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemovalCheck {
    pub community_id: i32,
    pub related_id: i32,
    /// Communities that would lose their path between the two endpoints.
    pub dependents: Vec<i32>,
    /// A shared active member holds a staff role in both communities.
    pub has_shared_resources: bool,
}

impl RemovalCheck {
    pub fn is_allowed(&self) -> bool {
        self.dependents.is_empty() && !self.has_shared_resources
    }
}
