use thiserror::Error;

use crate::model::community::PrivacyLevel;

/// Domain rules a request can break.
///
/// Each variant carries the ids involved so callers can report the exact conflict.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BusinessRuleError {
    #[error("Community cannot relate to itself (community {community_id})")]
    SelfRelationship { community_id: i32 },

    #[error("Private communities cannot relate to public communities ({private_id} and {public_id})")]
    PrivacyIncompatible { private_id: i32, public_id: i32 },

    #[error("Cannot create explicit relationship with inherited community {related_id} of community {community_id}")]
    InheritedRelationship { community_id: i32, related_id: i32 },

    #[error("Communities depend on this relationship: {dependents:?}")]
    DependentCommunities {
        community_id: i32,
        related_id: i32,
        dependents: Vec<i32>,
    },

    #[error("Cannot remove relationship with active shared resources ({community_id} and {related_id})")]
    SharedResources { community_id: i32, related_id: i32 },

    #[error("Invalid privacy transition from {from} to {to}")]
    InvalidPrivacyTransition { from: PrivacyLevel, to: PrivacyLevel },

    #[error("No pending invitation found for user {user_id} in community {community_id}")]
    NoPendingInvitation { community_id: i32, user_id: i32 },

    #[error("Owner cannot leave community {community_id}")]
    OwnerCannotLeave { community_id: i32 },

    #[error("User {user_id} is already a member of community {community_id}")]
    AlreadyMember { community_id: i32, user_id: i32 },

    #[error("User {user_id} already has a pending invitation to community {community_id}")]
    AlreadyInvited { community_id: i32, user_id: i32 },

    #[error("User {user_id} is not an active member of community {community_id}")]
    NotMember { community_id: i32, user_id: i32 },

    #[error("Community {community_id} only accepts members through invitations")]
    InvitationRequired { community_id: i32 },

    #[error("User {user_id} requires premium status: {reason}")]
    PremiumRequired { user_id: i32, reason: String },

    #[error("User {user_id} already owns the maximum of {limit} communities")]
    OwnedCommunityLimit { user_id: i32, limit: u64 },

    #[error("User {user_id} is not eligible: {reason}")]
    UserNotEligible { user_id: i32, reason: String },

    #[error("Community name '{name}' is already taken")]
    NameTaken { name: String },

    #[error("The owner role of user {user_id} in community {community_id} can only change through ownership transfer")]
    OwnerRoleProtected { community_id: i32, user_id: i32 },
}
