//! Membership lifecycle: invite, approve, reject, direct add, leave and status changes.
//!
//! Every operation runs on the caller's connection, normally the façade's transaction.
//! Counter changes are computed and checked before the first write and stored with a
//! compare-and-set on the counts that were read.

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
        member::{CommunityMember, CommunityRole, MembershipState},
        user::User,
    },
    service::{quota::QuotaEnforcer, role::RoleHierarchy},
};

/// Pending change to a community's member counters.
///
/// Construction fails with a state error if the result would break
/// `total_count >= active_count >= 0`, so nothing is written for an impossible update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterUpdate {
    community_id: i32,
    expected: (i32, i32),
    next: (i32, i32),
}

impl CounterUpdate {
    pub fn new(community: &Community, total_delta: i32, active_delta: i32) -> Result<Self, AppError> {
        let expected = (community.total_count, community.active_count);
        let next = (expected.0 + total_delta, expected.1 + active_delta);

        if next.1 < 0 || next.0 < next.1 {
            return Err(AppError::state(format!(
                "Member counters of community {} would become total {} active {}",
                community.id, next.0, next.1
            )));
        }

        Ok(Self {
            community_id: community.id,
            expected,
            next,
        })
    }

    pub fn next(&self) -> (i32, i32) {
        self.next
    }

    /// Writes the new counters if the stored ones still match what was read.
    pub async fn apply<C: ConnectionTrait>(&self, db: &C) -> Result<(), AppError> {
        if self.next == self.expected {
            return Ok(());
        }

        let updated = CommunityRepository::new(db)
            .update_counts(self.community_id, self.expected, self.next)
            .await?;

        if !updated {
            return Err(AppError::Concurrency(format!(
                "member counters of community {} changed",
                self.community_id
            )));
        }

        Ok(())
    }
}

pub struct MembershipLifecycle<'a, C: ConnectionTrait> {
    db: &'a C,
    quotas: &'a QuotaEnforcer,
}

impl<'a, C: ConnectionTrait> MembershipLifecycle<'a, C> {
    pub fn new(db: &'a C, quotas: &'a QuotaEnforcer) -> Self {
        Self { db, quotas }
    }

    /// Invites a user into a community with the given role.
    ///
    /// A former member's inactive row is reset to the invited state instead of creating
    /// a new row.
    ///
    /// # Returns
    /// - `Ok(CommunityMember)` - The invited row
    /// - `Err(AppError::Validation)` - No inviter given, or `role` is owner
    /// - `Err(AppError::ResourceNotFound)` - Inviter or invitee does not exist
    /// - `Err(AppError::AccessDenied)` - Inviter is not active staff or may not grant `role`
    /// - `Err(AppError::BusinessRule)` - Invitee is already active or invited
    /// - `Err(AppError::QuotaExceeded)` - Member or pending invitation limit reached
    /// - `Err(AppError::State)` - Community is inactive
    pub async fn invite(
        &self,
        community: &Community,
        user_id: i32,
        inviter_id: Option<i32>,
        role: CommunityRole,
    ) -> Result<CommunityMember, AppError> {
        require_active(community)?;

        let inviter_id = inviter_id
            .ok_or_else(|| AppError::Validation("An inviter is required to invite".to_string()))?;
        let users = UserRepository::new(self.db);
        let members = CommunityMemberRepository::new(self.db);

        if users.get_by_id(inviter_id).await?.is_none() {
            return Err(AppError::not_found("user", inviter_id));
        }

        let inviter = members
            .get(community.id, inviter_id)
            .await?
            .filter(|member| member.is_active && member.role.is_staff())
            .ok_or_else(|| {
                AppError::access_denied(inviter_id, "only active community staff can invite")
            })?;

        if !RoleHierarchy::can_assign(inviter.role, role, inviter_id == community.owner_id) {
            return Err(AppError::access_denied(
                inviter_id,
                format!("{} cannot invite as {}", inviter.role, role),
            ));
        }
        if role == CommunityRole::Owner {
            return Err(AppError::Validation(
                "Cannot invite a user as owner".to_string(),
            ));
        }

        self.require_user(user_id).await?;
        let existing = members.get(community.id, user_id).await?;
        reject_current_member(community.id, user_id, existing.as_ref())?;

        let owner_is_premium = self.quotas.owner_is_premium(self.db, community).await?;
        self.quotas
            .check_members(owner_is_premium, community.total_count as u64)?;
        self.quotas
            .check_pending_invitations(members.count_pending(community.id).await?)?;

        let member = match existing {
            Some(mut former) => {
                former.role = role;
                former.role_assigned_at = None;
                former.role_assigned_by = Some(inviter_id);
                self.save(false, &former).await?;
                former
            }
            None => {
                members
                    .create(NewMember {
                        community_id: community.id,
                        user_id,
                        role,
                        is_active: false,
                        joined_at: None,
                        role_assigned_at: None,
                        role_assigned_by: Some(inviter_id),
                    })
                    .await?
            }
        };

        tracing::info!(
            "User {} invited user {} to community {} as {}",
            inviter_id,
            user_id,
            community.id,
            role
        );

        Ok(member)
    }

    /// Accepts a pending invitation and activates the member.
    ///
    /// `total_count` grows only for members who never joined before.
    pub async fn approve(
        &self,
        community: &Community,
        user_id: i32,
    ) -> Result<CommunityMember, AppError> {
        require_active(community)?;
        self.require_user(user_id).await?;

        let mut member = self.pending_invitation(community.id, user_id).await?;
        let first_join = !member.has_joined();

        if first_join {
            let owner_is_premium = self.quotas.owner_is_premium(self.db, community).await?;
            self.quotas
                .check_members(owner_is_premium, community.total_count as u64)?;
        }
        let counts = CounterUpdate::new(community, i32::from(first_join), 1)?;

        let now = Utc::now();
        member.is_active = true;
        member.role_assigned_at = Some(now);
        member.joined_at = member.joined_at.or(Some(now));

        self.save(false, &member).await?;
        counts.apply(self.db).await?;

        tracing::info!("User {} joined community {}", user_id, community.id);

        Ok(member)
    }

    /// Declines a pending invitation.
    ///
    /// A never-joined invitee's row is deleted; a former member's row goes back to
    /// inactive.
    pub async fn reject(&self, community: &Community, user_id: i32) -> Result<(), AppError> {
        self.require_user(user_id).await?;

        let mut member = self.pending_invitation(community.id, user_id).await?;

        if member.has_joined() {
            member.role_assigned_at = Some(Utc::now());
            self.save(false, &member).await?;
        } else if !CommunityMemberRepository::new(self.db)
            .delete_inactive(community.id, user_id)
            .await?
        {
            return Err(AppError::Concurrency(format!(
                "invitation of user {} to community {} changed",
                user_id, community.id
            )));
        }

        tracing::info!(
            "User {} rejected invitation to community {}",
            user_id,
            community.id
        );

        Ok(())
    }

    /// Adds a user without an invitation.
    ///
    /// Invitation-only communities refuse direct adds. Private communities accept only
    /// users holding the premium role. A former member is reactivated.
    pub async fn direct_add(
        &self,
        community: &Community,
        user_id: i32,
        role: CommunityRole,
        added_by: Option<i32>,
    ) -> Result<CommunityMember, AppError> {
        require_active(community)?;

        if community.privacy_level == PrivacyLevel::InvitationOnly {
            return Err(BusinessRuleError::InvitationRequired {
                community_id: community.id,
            }
            .into());
        }
        if role == CommunityRole::Owner {
            return Err(AppError::Validation(
                "Cannot add a user as owner".to_string(),
            ));
        }

        let user = self.require_user(user_id).await?;
        if community.privacy_level == PrivacyLevel::Private && !user.has_premium_role() {
            return Err(BusinessRuleError::PremiumRequired {
                user_id,
                reason: "joining a private community".to_string(),
            }
            .into());
        }

        let members = CommunityMemberRepository::new(self.db);
        let existing = members.get(community.id, user_id).await?;
        reject_current_member(community.id, user_id, existing.as_ref())?;

        let now = Utc::now();
        let member = match existing {
            Some(mut former) => {
                let counts = CounterUpdate::new(community, 0, 1)?;

                former.is_active = true;
                former.role = role;
                former.role_assigned_at = Some(now);
                former.role_assigned_by = added_by;
                former.joined_at = former.joined_at.or(Some(now));

                self.save(false, &former).await?;
                counts.apply(self.db).await?;
                former
            }
            None => {
                let owner_is_premium = self.quotas.owner_is_premium(self.db, community).await?;
                self.quotas
                    .check_members(owner_is_premium, community.total_count as u64)?;
                let counts = CounterUpdate::new(community, 1, 1)?;

                let member = members
                    .create(NewMember {
                        community_id: community.id,
                        user_id,
                        role,
                        is_active: true,
                        joined_at: Some(now),
                        role_assigned_at: Some(now),
                        role_assigned_by: added_by,
                    })
                    .await?;
                counts.apply(self.db).await?;
                member
            }
        };

        tracing::info!(
            "Added user {} to community {} as {}",
            user_id,
            community.id,
            role
        );

        Ok(member)
    }

    /// Deactivates the caller's own membership. The owner cannot leave.
    pub async fn leave(
        &self,
        community: &Community,
        user_id: i32,
    ) -> Result<CommunityMember, AppError> {
        self.require_user(user_id).await?;

        let mut member = CommunityMemberRepository::new(self.db)
            .get(community.id, user_id)
            .await?
            .filter(|member| member.is_active)
            .ok_or(BusinessRuleError::NotMember {
                community_id: community.id,
                user_id,
            })?;

        if member.is_owner() || community.owner_id == user_id {
            return Err(BusinessRuleError::OwnerCannotLeave {
                community_id: community.id,
            }
            .into());
        }

        let counts = CounterUpdate::new(community, 0, -1)?;
        member.is_active = false;

        self.save(true, &member).await?;
        counts.apply(self.db).await?;

        tracing::info!("User {} left community {}", user_id, community.id);

        Ok(member)
    }

    /// Removes or reinstates a member who has joined before.
    ///
    /// With `updated_by`, the updater must be active staff allowed by the role hierarchy
    /// to manage the member's role. Setting the current state again changes nothing.
    ///
    /// # Returns
    /// - `Ok(CommunityMember)` - The row after the update
    /// - `Err(AppError::BusinessRule)` - No membership row, or the member is the owner
    /// - `Err(AppError::AccessDenied)` - The updater may not manage this member
    /// - `Err(AppError::State)` - The row is a pending invitation
    pub async fn update_member_status(
        &self,
        community: &Community,
        user_id: i32,
        is_active: bool,
        updated_by: Option<i32>,
    ) -> Result<CommunityMember, AppError> {
        let members = CommunityMemberRepository::new(self.db);

        let mut member = members
            .get(community.id, user_id)
            .await?
            .ok_or(BusinessRuleError::NotMember {
                community_id: community.id,
                user_id,
            })?;

        if member.state() == MembershipState::Invited {
            return Err(AppError::state(format!(
                "User {} has a pending invitation to community {}",
                user_id, community.id
            )));
        }
        if member.is_owner() || community.owner_id == user_id {
            return Err(BusinessRuleError::OwnerRoleProtected {
                community_id: community.id,
                user_id,
            }
            .into());
        }

        if let Some(updater_id) = updated_by {
            let updater = members
                .get(community.id, updater_id)
                .await?
                .filter(|updater| updater.is_active && updater.role.is_staff())
                .ok_or_else(|| {
                    AppError::access_denied(updater_id, "only active community staff can do this")
                })?;

            if !RoleHierarchy::can_assign(
                updater.role,
                member.role,
                updater_id == community.owner_id,
            ) {
                return Err(AppError::access_denied(
                    updater_id,
                    format!("{} cannot manage a {}", updater.role, member.role),
                ));
            }
        }

        if member.is_active == is_active {
            return Ok(member);
        }
        if is_active {
            require_active(community)?;
        }

        let counts = CounterUpdate::new(community, 0, if is_active { 1 } else { -1 })?;
        member.is_active = is_active;
        if is_active {
            member.role_assigned_at = Some(Utc::now());
            member.role_assigned_by = updated_by;
        }

        self.save(!is_active, &member).await?;
        counts.apply(self.db).await?;

        tracing::info!(
            "Set membership of user {} in community {} to {}",
            user_id,
            community.id,
            if is_active { "active" } else { "inactive" }
        );

        Ok(member)
    }

    async fn pending_invitation(
        &self,
        community_id: i32,
        user_id: i32,
    ) -> Result<CommunityMember, AppError> {
        CommunityMemberRepository::new(self.db)
            .get(community_id, user_id)
            .await?
            .filter(|member| member.state() == MembershipState::Invited)
            .ok_or_else(|| {
                BusinessRuleError::NoPendingInvitation {
                    community_id,
                    user_id,
                }
                .into()
            })
    }

    async fn require_user(&self, user_id: i32) -> Result<User, AppError> {
        UserRepository::new(self.db)
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("user", user_id))
    }

    async fn save(&self, expected_active: bool, member: &CommunityMember) -> Result<(), AppError> {
        let saved = CommunityMemberRepository::new(self.db)
            .save(expected_active, member)
            .await?;

        if !saved {
            return Err(AppError::Concurrency(format!(
                "membership of user {} in community {} changed",
                member.user_id, member.community_id
            )));
        }

        Ok(())
    }
}

fn require_active(community: &Community) -> Result<(), AppError> {
    if !community.is_active {
        return Err(AppError::state(format!(
            "Community {} is inactive",
            community.id
        )));
    }

    Ok(())
}

fn reject_current_member(
    community_id: i32,
    user_id: i32,
    existing: Option<&CommunityMember>,
) -> Result<(), AppError> {
    match existing.map(CommunityMember::state) {
        Some(MembershipState::Active) => Err(BusinessRuleError::AlreadyMember {
            community_id,
            user_id,
        }
        .into()),
        Some(MembershipState::Invited) => Err(BusinessRuleError::AlreadyInvited {
            community_id,
            user_id,
        }
        .into()),
        Some(MembershipState::Inactive) | None => Ok(()),
    }
}
