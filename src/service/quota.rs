//! Quota limits for members, relationships, owned communities and invitations.

use sea_orm::ConnectionTrait;

use crate::{
    config::QuotaLimits,
    data::user::UserRepository,
    error::{business::BusinessRuleError, AppError},
    model::community::Community,
};

/// Compares live counts against the configured [`QuotaLimits`].
#[derive(Debug, Clone, Copy, Default)]
pub struct QuotaEnforcer {
    limits: QuotaLimits,
}

impl QuotaEnforcer {
    pub fn new(limits: QuotaLimits) -> Self {
        Self { limits }
    }

    pub fn member_limit(&self, owner_is_premium: bool) -> u64 {
        if owner_is_premium {
            self.limits.max_members_premium
        } else {
            self.limits.max_members_free
        }
    }

    pub fn relationship_limit(&self) -> u64 {
        self.limits.max_relationships
    }

    pub fn owned_community_limit(&self, user_is_premium: bool) -> u64 {
        if user_is_premium {
            self.limits.max_owned_premium
        } else {
            self.limits.max_owned_free
        }
    }

    pub fn pending_invitation_limit(&self) -> u64 {
        self.limits.max_pending_invites
    }

    pub fn check_members(&self, owner_is_premium: bool, current: u64) -> Result<(), AppError> {
        check("members", self.member_limit(owner_is_premium), current)
    }

    pub fn check_relationships(&self, community_id: i32, current: u64) -> Result<(), AppError> {
        check(
            &format!("relationships of community {}", community_id),
            self.relationship_limit(),
            current,
        )
    }

    /// Fails with [`BusinessRuleError::OwnedCommunityLimit`] once `user_id` owns as many
    /// active communities as its tier allows.
    pub fn check_owned_communities(
        &self,
        user_id: i32,
        user_is_premium: bool,
        current: u64,
    ) -> Result<(), AppError> {
        let limit = self.owned_community_limit(user_is_premium);
        if current >= limit {
            tracing::debug!(
                "User {} owns {} communities, limit {}",
                user_id,
                current,
                limit
            );
            return Err(BusinessRuleError::OwnedCommunityLimit { user_id, limit }.into());
        }

        Ok(())
    }

    pub fn check_pending_invitations(&self, current: u64) -> Result<(), AppError> {
        check("pending invitations", self.pending_invitation_limit(), current)
    }

    /// Whether the community's owner is premium for tier purposes.
    ///
    /// A missing owner row counts as free tier.
    pub async fn owner_is_premium<C: ConnectionTrait>(
        &self,
        db: &C,
        community: &Community,
    ) -> Result<bool, AppError> {
        let owner = UserRepository::new(db).get_by_id(community.owner_id).await?;

        Ok(owner.is_some_and(|owner| owner.is_premium_tier()))
    }
}

fn check(quota: &str, limit: u64, current: u64) -> Result<(), AppError> {
    if current >= limit {
        tracing::debug!("Quota '{}' reached: {} of {}", quota, current, limit);
        return Err(AppError::quota(quota, limit, current));
    }

    Ok(())
}
