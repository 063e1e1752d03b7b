//! Audit notifications for committed community changes.
//!
//! Notifiers are called after the transaction commits. A failing notifier is logged by
//! the caller and never fails the operation that triggered it.

use serde::Serialize;
use thiserror::Error;

use crate::model::{community::PrivacyLevel, member::CommunityRole};

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Failed to serialize community event: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Notification delivery failed: {0}")]
    Delivery(String),
}

/// A committed change to a community.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CommunityEvent {
    Created {
        community_id: i32,
        owner_id: i32,
    },
    Updated {
        community_id: i32,
    },
    Deleted {
        community_id: i32,
    },
    OwnershipTransferred {
        community_id: i32,
        from_user_id: i32,
        to_user_id: i32,
    },
    Membership {
        community_id: i32,
        user_id: i32,
        action: &'static str,
    },
    RoleAssigned {
        community_id: i32,
        user_id: i32,
        role: CommunityRole,
        assigned_by: Option<i32>,
    },
    MemberStatusChanged {
        community_id: i32,
        user_id: i32,
        is_active: bool,
    },
    PrivacyChanged {
        community_id: i32,
        from: PrivacyLevel,
        to: PrivacyLevel,
    },
    RelationshipAdded {
        community_id: i32,
        related_id: i32,
    },
    RelationshipRemoved {
        community_id: i32,
        related_id: i32,
    },
}

/// Receives committed community events.
pub trait Notifier: Send + Sync {
    fn notify(&self, event: &CommunityEvent) -> Result<(), NotifyError>;
}

/// Writes each event as one JSON line to the `community_audit` tracing target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, event: &CommunityEvent) -> Result<(), NotifyError> {
        let line = serde_json::to_string(event)?;

        tracing::info!(target: "community_audit", "{}", line);

        Ok(())
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _event: &CommunityEvent) -> Result<(), NotifyError> {
        Ok(())
    }
}
