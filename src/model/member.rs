//! Community membership domain models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use sea_orm::DbErr;
use serde::Serialize;

use crate::error::AppError;

/// Role a member holds inside one community.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommunityRole {
    Owner,
    Admin,
    Moderator,
    Member,
}

impl CommunityRole {
    pub const ALL: [CommunityRole; 4] = [Self::Owner, Self::Admin, Self::Moderator, Self::Member];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Admin => "admin",
            Self::Moderator => "moderator",
            Self::Member => "member",
        }
    }

    /// Whether the role may manage other members (invite, remove, reinstate).
    pub fn is_staff(&self) -> bool {
        matches!(self, Self::Owner | Self::Admin | Self::Moderator)
    }
}

impl fmt::Display for CommunityRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommunityRole {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "owner" => Ok(Self::Owner),
            "admin" => Ok(Self::Admin),
            "moderator" => Ok(Self::Moderator),
            "member" => Ok(Self::Member),
            other => Err(AppError::Validation(format!("Invalid role: {}", other))),
        }
    }
}

/// Lifecycle state derived from a membership row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipState {
    /// Invitation sent, not yet approved.
    Invited,
    Active,
    /// Left or removed after having been active.
    Inactive,
}

/// Membership of a user in a community.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommunityMember {
    pub community_id: i32,
    pub user_id: i32,
    pub role: CommunityRole,
    pub is_active: bool,
    /// First activation; `None` until the member joins.
    pub joined_at: Option<DateTime<Utc>>,
    pub role_assigned_at: Option<DateTime<Utc>>,
    pub role_assigned_by: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl CommunityMember {
    /// Converts an entity model to a membership domain model.
    ///
    /// # Returns
    /// - `Ok(CommunityMember)` - The converted membership
    /// - `Err(DbErr::Custom)` - Stored role is not a known value
    pub fn from_entity(entity: entity::community_member::Model) -> Result<Self, DbErr> {
        let role = entity.role.parse::<CommunityRole>().map_err(|_| {
            DbErr::Custom(format!(
                "Member {} of community {} has unknown role '{}'",
                entity.user_id, entity.community_id, entity.role
            ))
        })?;

        Ok(Self {
            community_id: entity.community_id,
            user_id: entity.user_id,
            role,
            is_active: entity.is_active,
            joined_at: entity.joined_at,
            role_assigned_at: entity.role_assigned_at,
            role_assigned_by: entity.role_assigned_by,
            created_at: entity.created_at,
        })
    }

    pub fn state(&self) -> MembershipState {
        if self.is_active {
            MembershipState::Active
        } else if self.role_assigned_at.is_none() {
            MembershipState::Invited
        } else {
            MembershipState::Inactive
        }
    }

    /// Whether the member has been active at some point.
    pub fn has_joined(&self) -> bool {
        self.joined_at.is_some()
    }

    pub fn is_owner(&self) -> bool {
        self.role == CommunityRole::Owner
    }
}

/// Membership action requested through the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipAction {
    Invite,
    Approve,
    Reject,
    Leave,
    /// Direct add without an invitation.
    Add,
}

impl MembershipAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Invite => "invite",
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Leave => "leave",
            Self::Add => "add",
        }
    }
}

impl FromStr for MembershipAction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "invite" => Ok(Self::Invite),
            "approve" => Ok(Self::Approve),
            "reject" => Ok(Self::Reject),
            "leave" => Ok(Self::Leave),
            "add" => Ok(Self::Add),
            other => Err(AppError::Validation(format!(
                "Invalid membership action: {}",
                other
            ))),
        }
    }
}

/// Aggregates over a community's membership rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MemberStats {
    /// Rows that have ever been active.
    pub total_members: u64,
    pub active_members: u64,
    pub pending_invitations: u64,
}

/// A role as assigned to one member.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleChange {
    pub user_id: i32,
    pub role: CommunityRole,
    pub assigned_at: Option<DateTime<Utc>>,
    pub assigned_by: Option<i32>,
}

impl RoleChange {
    pub fn of(member: &CommunityMember) -> Self {
        Self {
            user_id: member.user_id,
            role: member.role,
            assigned_at: member.role_assigned_at,
            assigned_by: member.role_assigned_by,
        }
    }
}

/// Assignments made by an admin or moderator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModerationActivity {
    /// Other members whose current role or invitation came from this member.
    pub managed_members: u64,
    /// Active members among them.
    pub active_managed_members: u64,
    /// Newest assignments first, at most [`MemberActivity::RECENT_ACTIONS`].
    pub recent_actions: Vec<RoleChange>,
}

/// Activity summary of one membership.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberActivity {
    pub community_id: i32,
    pub user_id: i32,
    pub member_since: Option<DateTime<Utc>>,
    pub current_role: CommunityRole,
    /// Only the current assignment is stored, so this holds one entry.
    pub role_history: Vec<RoleChange>,
    pub is_active: bool,
    pub last_activity: Option<DateTime<Utc>>,
    /// Present for admins and moderators.
    pub moderation: Option<ModerationActivity>,
}

impl MemberActivity {
    pub const RECENT_ACTIONS: usize = 10;

    /// Builds the summary from a membership row and the rows it assigned.
    ///
    /// `managed` is ignored unless the member is an admin or moderator.
    pub fn new(member: &CommunityMember, mut managed: Vec<CommunityMember>) -> Self {
        let moderation = matches!(member.role, CommunityRole::Admin | CommunityRole::Moderator)
            .then(|| {
                managed.sort_by(|a, b| b.role_assigned_at.cmp(&a.role_assigned_at));

                ModerationActivity {
                    managed_members: managed.len() as u64,
                    active_managed_members: managed.iter().filter(|m| m.is_active).count() as u64,
                    recent_actions: managed
                        .iter()
                        .take(Self::RECENT_ACTIONS)
                        .map(RoleChange::of)
                        .collect(),
                }
            });

        Self {
            community_id: member.community_id,
            user_id: member.user_id,
            member_since: member.joined_at,
            current_role: member.role,
            role_history: vec![RoleChange::of(member)],
            is_active: member.is_active,
            last_activity: member.role_assigned_at.or(member.joined_at),
            moderation,
        }
    }
}
