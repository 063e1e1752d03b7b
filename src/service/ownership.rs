//! Ownership transfer between two users of a community.

use chrono::Utc;
use sea_orm::ConnectionTrait;

use crate::{
    data::{
        community::CommunityRepository,
        member::{CommunityMemberRepository, NewMember},
        user::UserRepository,
    },
    error::{business::BusinessRuleError, AppError},
    model::{
        community::{Community, PrivacyLevel},
        member::{CommunityMember, CommunityRole},
        user::User,
    },
    service::{membership::CounterUpdate, quota::QuotaEnforcer},
};

pub struct OwnershipTransferWorkflow<'a, C: ConnectionTrait> {
    db: &'a C,
    quotas: &'a QuotaEnforcer,
}

impl<'a, C: ConnectionTrait> OwnershipTransferWorkflow<'a, C> {
    pub fn new(db: &'a C, quotas: &'a QuotaEnforcer) -> Self {
        Self { db, quotas }
    }

    /// Moves ownership of a community from `current_owner_id` to `new_owner_id`.
    ///
    /// The old owner stays as an admin. The new owner's membership is promoted, or
    /// created, as an active owner membership.
    ///
    /// # Returns
    /// - `Ok(Community)` - The community with its new owner
    /// - `Err(AppError::ResourceNotFound)` - Community or new owner does not exist
    /// - `Err(AppError::AccessDenied)` - `current_owner_id` does not own the community
    /// - `Err(AppError::Validation)` - Same user on both sides, or the new owner is a
    ///   member below moderator
    /// - `Err(AppError::BusinessRule)` - New owner is ineligible or at the owned limit
    /// - `Err(AppError::State)` - Community is inactive, or a write failed
    pub async fn transfer(
        &self,
        community_id: i32,
        new_owner_id: i32,
        current_owner_id: i32,
    ) -> Result<Community, AppError> {
        let communities = CommunityRepository::new(self.db);

        let community = communities
            .get_by_id(community_id)
            .await?
            .ok_or_else(|| AppError::not_found("community", community_id))?;

        if community.owner_id != current_owner_id {
            return Err(AppError::access_denied(
                current_owner_id,
                format!("not the owner of community {}", community_id),
            ));
        }
        if !community.is_active {
            return Err(AppError::state(format!(
                "Community {} is inactive",
                community_id
            )));
        }
        if new_owner_id == current_owner_id {
            return Err(AppError::Validation(
                "New owner must differ from the current owner".to_string(),
            ));
        }

        let new_owner = UserRepository::new(self.db)
            .get_by_id(new_owner_id)
            .await?
            .ok_or_else(|| AppError::not_found("user", new_owner_id))?;

        let existing = self.check_eligibility(&community, &new_owner).await?;

        self.apply(&community, existing, current_owner_id, new_owner_id)
            .await
            .map_err(|err| {
                tracing::error!(
                    "Ownership transfer of community {} to user {} failed: {}",
                    community_id,
                    new_owner_id,
                    err
                );
                AppError::state_with_source("Ownership transfer failed", err)
            })?;

        tracing::info!(
            "Transferred ownership of community {} from user {} to user {}",
            community_id,
            current_owner_id,
            new_owner_id
        );

        communities
            .get_by_id(community_id)
            .await?
            .ok_or_else(|| AppError::not_found("community", community_id))
    }

    /// Returns the new owner's current membership, if any, once every rule passes.
    async fn check_eligibility(
        &self,
        community: &Community,
        new_owner: &User,
    ) -> Result<Option<CommunityMember>, AppError> {
        if !new_owner.is_active || !new_owner.email_verified {
            return Err(BusinessRuleError::UserNotEligible {
                user_id: new_owner.id,
                reason: "owner must be active and have a verified email".to_string(),
            }
            .into());
        }

        let owned = CommunityRepository::new(self.db)
            .count_owned_by(new_owner.id, true)
            .await?;
        self.quotas
            .check_owned_communities(new_owner.id, new_owner.is_premium_tier(), owned)?;

        if community.privacy_level == PrivacyLevel::Private && !new_owner.has_premium_role() {
            return Err(BusinessRuleError::PremiumRequired {
                user_id: new_owner.id,
                reason: "owning a private community".to_string(),
            }
            .into());
        }

        let existing = CommunityMemberRepository::new(self.db)
            .get(community.id, new_owner.id)
            .await?;

        if let Some(member) = &existing {
            if !matches!(member.role, CommunityRole::Admin | CommunityRole::Moderator) {
                return Err(AppError::Validation(format!(
                    "User {} must be an admin or moderator to become owner, not {}",
                    new_owner.id, member.role
                )));
            }
        }

        Ok(existing)
    }

    async fn apply(
        &self,
        community: &Community,
        existing: Option<CommunityMember>,
        current_owner_id: i32,
        new_owner_id: i32,
    ) -> Result<(), AppError> {
        let members = CommunityMemberRepository::new(self.db);
        let now = Utc::now();

        if !CommunityRepository::new(self.db)
            .set_owner(community.id, current_owner_id, new_owner_id)
            .await?
        {
            return Err(AppError::Concurrency(format!(
                "owner of community {} changed",
                community.id
            )));
        }

        let mut old_owner = members
            .get(community.id, current_owner_id)
            .await?
            .ok_or_else(|| {
                AppError::state(format!(
                    "Owner {} has no membership in community {}",
                    current_owner_id, community.id
                ))
            })?;
        let old_was_active = old_owner.is_active;
        old_owner.role = CommunityRole::Admin;
        old_owner.role_assigned_at = Some(now);
        old_owner.role_assigned_by = Some(new_owner_id);
        save(&members, old_was_active, &old_owner).await?;

        match existing {
            Some(mut member) => {
                let was_active = member.is_active;
                let counts = (!was_active)
                    .then(|| CounterUpdate::new(community, i32::from(!member.has_joined()), 1))
                    .transpose()?;

                member.role = CommunityRole::Owner;
                member.is_active = true;
                member.joined_at = member.joined_at.or(Some(now));
                member.role_assigned_at = Some(now);
                member.role_assigned_by = Some(current_owner_id);
                save(&members, was_active, &member).await?;

                if let Some(counts) = counts {
                    counts.apply(self.db).await?;
                }
            }
            None => {
                let counts = CounterUpdate::new(community, 1, 1)?;

                members
                    .create(NewMember {
                        community_id: community.id,
                        user_id: new_owner_id,
                        role: CommunityRole::Owner,
                        is_active: true,
                        joined_at: Some(now),
                        role_assigned_at: Some(now),
                        role_assigned_by: Some(current_owner_id),
                    })
                    .await?;
                counts.apply(self.db).await?;
            }
        }

        Ok(())
    }
}

async fn save<C: ConnectionTrait>(
    members: &CommunityMemberRepository<'_, C>,
    expected_active: bool,
    member: &CommunityMember,
) -> Result<(), AppError> {
    if !members.save(expected_active, member).await? {
        return Err(AppError::Concurrency(format!(
            "membership of user {} in community {} changed",
            member.user_id, member.community_id
        )));
    }

    Ok(())
}
