use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};

use crate::{
    config::EngineConfig,
    data::{
        community::CommunityRepository,
        member::{CommunityMemberRepository, NewMember},
        relationship::CommunityRelationshipRepository,
        user::UserRepository,
    },
    error::{business::BusinessRuleError, AppError},
    model::{
        community::{
            Community, CommunitySearchParams, CreateCommunityParams, PaginatedCommunities,
            PrivacyLevel, UpdateCommunityParams,
        },
        member::{
            CommunityMember, CommunityRole, MemberActivity, MemberStats, MembershipAction,
        },
        relationship::{InheritedRelationship, RelationshipAction, RemovalCheck},
        user::User,
    },
    service::{
        membership::{CounterUpdate, MembershipLifecycle},
        notifier::{CommunityEvent, Notifier},
        ownership::OwnershipTransferWorkflow,
        privacy::PrivacyTransitionValidator,
        quota::QuotaEnforcer,
        relationship::RelationshipManager,
        role::RoleAssignment,
        DomainService,
    },
};

/// Entry point for every community operation.
///
/// Each mutating call runs in one transaction that is committed on success and rolled
/// back on any error. Events are sent to the notifier only after the commit.
pub struct CommunityService<'a> {
    db: &'a DatabaseConnection,
    config: &'a EngineConfig,
    notifier: &'a dyn Notifier,
    quotas: QuotaEnforcer,
}

impl<'a> CommunityService<'a> {
    pub fn new(
        db: &'a DatabaseConnection,
        config: &'a EngineConfig,
        notifier: &'a dyn Notifier,
    ) -> Self {
        Self {
            db,
            config,
            notifier,
            quotas: QuotaEnforcer::new(config.quotas),
        }
    }

    /// Creates a community and its owner membership.
    ///
    /// # Returns
    /// - `Ok(Community)` - The new community, counting its owner as a member
    /// - `Err(AppError::Validation)` - Empty or restricted name, or the owner is missing
    ///   or inactive
    /// - `Err(AppError::BusinessRule)` - Name taken, owned-community limit reached, or a
    ///   private community without the premium role
    pub async fn create_community(
        &self,
        params: CreateCommunityParams,
    ) -> Result<Community, AppError> {
        self.validate_name(&params.name)?;

        let txn = self.db.begin().await?;
        let result = async {
            let owner = UserRepository::new(&txn)
                .get_by_id(params.owner_id)
                .await?
                .filter(|owner| owner.is_active)
                .ok_or_else(|| {
                    AppError::Validation(format!(
                        "Owner {} does not exist or is inactive",
                        params.owner_id
                    ))
                })?;

            let communities = CommunityRepository::new(&txn);

            let owned = communities.count_owned_by(owner.id, true).await?;
            self.quotas
                .check_owned_communities(owner.id, owner.is_premium_tier(), owned)?;

            if params.privacy_level == PrivacyLevel::Private && !owner.has_premium_role() {
                return Err(BusinessRuleError::PremiumRequired {
                    user_id: owner.id,
                    reason: "creating a private community".to_string(),
                }
                .into());
            }

            if communities.get_by_name(&params.name).await?.is_some() {
                return Err(BusinessRuleError::NameTaken { name: params.name }.into());
            }

            let community = communities.create(params).await?;
            let counts = CounterUpdate::new(&community, 1, 1)?;

            let now = chrono::Utc::now();
            CommunityMemberRepository::new(&txn)
                .create(NewMember {
                    community_id: community.id,
                    user_id: owner.id,
                    role: CommunityRole::Owner,
                    is_active: true,
                    joined_at: Some(now),
                    role_assigned_at: Some(now),
                    role_assigned_by: None,
                })
                .await?;
            counts.apply(&txn).await?;

            self.require_community(&txn, community.id).await
        }
        .await;
        let community = finish(txn, result).await?;

        tracing::info!(
            "Created community {} '{}' owned by user {}",
            community.id,
            community.name,
            community.owner_id
        );
        self.notify(CommunityEvent::Created {
            community_id: community.id,
            owner_id: community.owner_id,
        });

        Ok(community)
    }

    pub async fn get_community(&self, community_id: i32) -> Result<Community, AppError> {
        CommunityRepository::new(self.db)
            .get_by_id(community_id)
            .await?
            .ok_or_else(|| AppError::not_found("community", community_id))
    }

    /// Updates name, description or active flag of a community.
    pub async fn update_community(
        &self,
        community_id: i32,
        params: UpdateCommunityParams,
    ) -> Result<Community, AppError> {
        if let Some(name) = &params.name {
            self.validate_name(name)?;
        }

        let txn = self.db.begin().await?;
        let result = async {
            let communities = CommunityRepository::new(&txn);

            if let Some(name) = &params.name {
                if let Some(other) = communities.get_by_name(name).await? {
                    if other.id != community_id {
                        return Err(BusinessRuleError::NameTaken { name: name.clone() }.into());
                    }
                }
            }

            communities
                .update(community_id, params)
                .await?
                .ok_or_else(|| AppError::not_found("community", community_id))
        }
        .await;
        let community = finish(txn, result).await?;

        tracing::info!("Updated community {}", community_id);
        self.notify(CommunityEvent::Updated { community_id });

        Ok(community)
    }

    /// Deletes a community with its memberships and relationships.
    ///
    /// Returns `false` if the community does not exist.
    pub async fn delete_community(&self, community_id: i32) -> Result<bool, AppError> {
        let txn = self.db.begin().await?;
        let result = CommunityRepository::new(&txn)
            .delete(community_id)
            .await
            .map_err(AppError::from);
        let deleted = finish(txn, result).await?;

        if deleted {
            tracing::info!("Deleted community {}", community_id);
            self.notify(CommunityEvent::Deleted { community_id });
        }

        Ok(deleted)
    }

    pub async fn transfer_ownership(
        &self,
        community_id: i32,
        new_owner_id: i32,
        current_owner_id: i32,
    ) -> Result<Community, AppError> {
        let txn = self.db.begin().await?;
        let result = OwnershipTransferWorkflow::new(&txn, &self.quotas)
            .transfer(community_id, new_owner_id, current_owner_id)
            .await;
        let community = finish(txn, result).await?;

        self.notify(CommunityEvent::OwnershipTransferred {
            community_id,
            from_user_id: current_owner_id,
            to_user_id: new_owner_id,
        });

        Ok(community)
    }

    /// Runs a membership action for `user_id`.
    ///
    /// # Arguments
    /// - `action` - One of `invite`, `approve`, `reject`, `leave`, `add`
    /// - `inviter_id` - Acting staff member for `invite`, recorded as the assigner for `add`
    /// - `role` - Role for `invite` and `add`, defaults to `member`
    ///
    /// # Returns
    /// - `Ok(true)` - The action was applied
    /// - `Err(AppError::Validation)` - Unknown action or role
    /// - `Err(AppError::ResourceNotFound)` - Community or user does not exist
    pub async fn manage_membership(
        &self,
        community_id: i32,
        user_id: i32,
        action: &str,
        inviter_id: Option<i32>,
        role: Option<&str>,
    ) -> Result<bool, AppError> {
        let action: MembershipAction = action.parse()?;
        let role = role
            .map(str::parse::<CommunityRole>)
            .transpose()?
            .unwrap_or(CommunityRole::Member);

        let txn = self.db.begin().await?;
        let result = async {
            let community = self.require_community(&txn, community_id).await?;
            let lifecycle = MembershipLifecycle::new(&txn, &self.quotas);

            match action {
                MembershipAction::Invite => {
                    lifecycle
                        .invite(&community, user_id, inviter_id, role)
                        .await?;
                }
                MembershipAction::Approve => {
                    lifecycle.approve(&community, user_id).await?;
                }
                MembershipAction::Reject => {
                    lifecycle.reject(&community, user_id).await?;
                }
                MembershipAction::Leave => {
                    lifecycle.leave(&community, user_id).await?;
                }
                MembershipAction::Add => {
                    lifecycle
                        .direct_add(&community, user_id, role, inviter_id)
                        .await?;
                }
            }

            Ok::<_, AppError>(true)
        }
        .await;
        let applied = finish(txn, result).await?;

        self.notify(CommunityEvent::Membership {
            community_id,
            user_id,
            action: action.as_str(),
        });

        Ok(applied)
    }

    /// Assigns a community role to a user.
    ///
    /// Failures after the community and user are found, an unknown role name included,
    /// are reported as `AppError::RoleAssignment` carrying the cause.
    pub async fn manage_member_roles(
        &self,
        community_id: i32,
        user_id: i32,
        role: &str,
        assigned_by: Option<i32>,
    ) -> Result<CommunityMember, AppError> {
        let txn = self.db.begin().await?;
        let result = self
            .assign_role(&txn, community_id, user_id, role, assigned_by)
            .await;
        let member = finish(txn, result).await?;

        self.notify(CommunityEvent::RoleAssigned {
            community_id,
            user_id,
            role: member.role,
            assigned_by,
        });

        Ok(member)
    }

    /// Assigns several roles in one transaction; either all apply or none do.
    pub async fn bulk_update_member_roles(
        &self,
        community_id: i32,
        role_updates: &[(i32, &str)],
        updated_by: i32,
    ) -> Result<bool, AppError> {
        let txn = self.db.begin().await?;
        let result = async {
            self.require_community(&txn, community_id).await?;

            let mut assigned = Vec::with_capacity(role_updates.len());
            for &(user_id, role) in role_updates {
                let member = self
                    .assign_role(&txn, community_id, user_id, role, Some(updated_by))
                    .await?;
                assigned.push((user_id, member.role));
            }

            Ok::<_, AppError>(assigned)
        }
        .await;
        let result = finish(txn, result).await;

        match result {
            Ok(assigned) => {
                for (user_id, role) in assigned {
                    self.notify(CommunityEvent::RoleAssigned {
                        community_id,
                        user_id,
                        role,
                        assigned_by: Some(updated_by),
                    });
                }
                Ok(true)
            }
            Err(err) => {
                tracing::error!(
                    "Bulk role update in community {} failed: {}",
                    community_id,
                    err
                );
                Err(err)
            }
        }
    }

    /// Lists `(user_id, role)` pairs of a community's members.
    pub async fn get_member_roles(
        &self,
        community_id: i32,
        role_filter: Option<&str>,
        active_only: bool,
    ) -> Result<Vec<(i32, CommunityRole)>, AppError> {
        let role_filter = role_filter
            .map(str::parse::<CommunityRole>)
            .transpose()?;
        self.get_community(community_id).await?;

        let members = CommunityMemberRepository::new(self.db)
            .get_members(community_id, role_filter, active_only)
            .await?;

        Ok(members
            .into_iter()
            .map(|member| (member.user_id, member.role))
            .collect())
    }

    /// Removes (`is_active = false`) or reinstates a member.
    ///
    /// Any failure past the community lookup is reported as a state error carrying the
    /// cause.
    pub async fn update_member_status(
        &self,
        community_id: i32,
        user_id: i32,
        is_active: bool,
        updated_by: Option<i32>,
    ) -> Result<CommunityMember, AppError> {
        let txn = self.db.begin().await?;
        let result = async {
            let community = self.require_community(&txn, community_id).await?;

            MembershipLifecycle::new(&txn, &self.quotas)
                .update_member_status(&community, user_id, is_active, updated_by)
                .await
                .map_err(|err| AppError::state_with_source("Failed to update member status", err))
        }
        .await;
        let member = finish(txn, result).await?;

        self.notify(CommunityEvent::MemberStatusChanged {
            community_id,
            user_id,
            is_active,
        });

        Ok(member)
    }

    /// Moves a community to another privacy level following the transition table.
    pub async fn change_privacy_level(
        &self,
        community_id: i32,
        new_level: PrivacyLevel,
    ) -> Result<Community, AppError> {
        self.change_privacy(community_id, new_level, None).await
    }

    /// Like [`Self::change_privacy_level`], for an acting user who must be an active owner
    /// or admin of the community.
    pub async fn change_privacy_level_as(
        &self,
        community_id: i32,
        new_level: PrivacyLevel,
        updated_by: i32,
    ) -> Result<Community, AppError> {
        self.change_privacy(community_id, new_level, Some(updated_by))
            .await
    }

    /// Adds or removes the relationship between two communities.
    ///
    /// # Returns
    /// - `Ok(true)` - The stored relationships changed
    /// - `Ok(false)` - Nothing to do: already related, or not related
    /// - `Err(AppError::Validation)` - Unknown action
    /// - `Err(AppError::ResourceNotFound)` - Either community does not exist
    pub async fn manage_community_relationships(
        &self,
        community_id: i32,
        related_id: i32,
        action: &str,
    ) -> Result<bool, AppError> {
        let action: RelationshipAction = action.parse()?;

        let txn = self.db.begin().await?;
        let result = async {
            self.require_community(&txn, community_id).await?;
            self.require_community(&txn, related_id).await?;

            let manager = RelationshipManager::new(&txn, &self.quotas, self.config.traversal);
            match action {
                RelationshipAction::Add => manager.add(community_id, related_id).await,
                RelationshipAction::Remove => manager.remove(community_id, related_id).await,
            }
        }
        .await;
        let changed = finish(txn, result).await?;

        if changed {
            self.notify(match action {
                RelationshipAction::Add => CommunityEvent::RelationshipAdded {
                    community_id,
                    related_id,
                },
                RelationshipAction::Remove => CommunityEvent::RelationshipRemoved {
                    community_id,
                    related_id,
                },
            });
        }

        Ok(changed)
    }

    /// Communities reachable through relationships, depth first, excluding the root.
    pub async fn get_inherited_relationships(
        &self,
        community_id: i32,
        include_inactive: bool,
    ) -> Result<Vec<InheritedRelationship>, AppError> {
        let txn = self.db.begin().await?;
        let result = async {
            self.require_community(&txn, community_id).await?;

            RelationshipManager::new(&txn, &self.quotas, self.config.traversal)
                .inherited(community_id, include_inactive)
                .await
        }
        .await;

        finish(txn, result).await
    }

    /// Reports whether the relationship could be removed and what blocks it.
    pub async fn validate_relationship_removal(
        &self,
        community_id: i32,
        related_id: i32,
    ) -> Result<RemovalCheck, AppError> {
        let txn = self.db.begin().await?;
        let result = async {
            self.require_community(&txn, community_id).await?;
            self.require_community(&txn, related_id).await?;

            RelationshipManager::new(&txn, &self.quotas, self.config.traversal)
                .validate_removal(community_id, related_id)
                .await
        }
        .await;

        finish(txn, result).await
    }

    pub async fn get_member_stats(&self, community_id: i32) -> Result<MemberStats, AppError> {
        self.get_community(community_id).await?;

        Ok(CommunityMemberRepository::new(self.db)
            .get_member_stats(community_id)
            .await?)
    }

    /// Summarizes a membership, with the assignments made by admins and moderators.
    ///
    /// # Returns
    /// - `Ok(MemberActivity)` - Summary of the membership row
    /// - `Err(AppError::ResourceNotFound)` - Community or membership does not exist
    pub async fn get_member_activity(
        &self,
        community_id: i32,
        user_id: i32,
    ) -> Result<MemberActivity, AppError> {
        self.get_community(community_id).await?;

        let members = CommunityMemberRepository::new(self.db);
        let member = members
            .get(community_id, user_id)
            .await?
            .ok_or_else(|| AppError::not_found("member", user_id))?;

        let managed = if matches!(member.role, CommunityRole::Admin | CommunityRole::Moderator) {
            members.get_assigned_by(community_id, user_id).await?
        } else {
            Vec::new()
        };

        Ok(MemberActivity::new(&member, managed))
    }

    /// Searches communities by name or description, one page at a time.
    pub async fn search_communities(
        &self,
        params: CommunitySearchParams,
    ) -> Result<PaginatedCommunities, AppError> {
        let (communities, total) = CommunityRepository::new(self.db).search(&params).await?;

        let total_pages = if params.per_page > 0 {
            total.div_ceil(params.per_page)
        } else {
            0
        };

        Ok(PaginatedCommunities {
            communities,
            total,
            page: params.page,
            per_page: params.per_page,
            total_pages,
        })
    }

    pub async fn get_user_communities(
        &self,
        user_id: i32,
        active_only: bool,
        privacy_level: Option<PrivacyLevel>,
    ) -> Result<Vec<Community>, AppError> {
        Ok(CommunityRepository::new(self.db)
            .get_user_communities(user_id, active_only, privacy_level)
            .await?)
    }

    /// Users holding `role` as active members of the community.
    pub async fn get_members_by_role(
        &self,
        community_id: i32,
        role: &str,
    ) -> Result<Vec<User>, AppError> {
        let role: CommunityRole = role.parse()?;
        self.get_community(community_id).await?;

        let user_ids = CommunityMemberRepository::new(self.db)
            .get_user_ids_by_role(community_id, role)
            .await?;

        Ok(UserRepository::new(self.db).get_many(&user_ids).await?)
    }

    async fn change_privacy(
        &self,
        community_id: i32,
        new_level: PrivacyLevel,
        updated_by: Option<i32>,
    ) -> Result<Community, AppError> {
        let txn = self.db.begin().await?;
        let result = async {
            let community = self.require_community(&txn, community_id).await?;

            if let Some(updater_id) = updated_by {
                let allowed = CommunityMemberRepository::new(&txn)
                    .get(community_id, updater_id)
                    .await?
                    .is_some_and(|member| {
                        member.is_active
                            && matches!(member.role, CommunityRole::Owner | CommunityRole::Admin)
                    });
                if !allowed {
                    return Err(AppError::access_denied(
                        updater_id,
                        "only the owner or an admin can change the privacy level",
                    ));
                }
            }

            PrivacyTransitionValidator::validate(community.privacy_level, new_level)?;

            if new_level == PrivacyLevel::Private {
                let owner_is_premium = UserRepository::new(&txn)
                    .get_by_id(community.owner_id)
                    .await?
                    .is_some_and(|owner| owner.has_premium_role());
                if !owner_is_premium {
                    return Err(BusinessRuleError::PremiumRequired {
                        user_id: community.owner_id,
                        reason: "owning a private community".to_string(),
                    }
                    .into());
                }
            }

            self.check_related_privacy(&txn, community_id, new_level)
                .await?;

            if !CommunityRepository::new(&txn)
                .set_privacy_level(community_id, community.privacy_level, new_level)
                .await?
            {
                return Err(AppError::Concurrency(format!(
                    "privacy level of community {} changed",
                    community_id
                )));
            }

            let updated = self.require_community(&txn, community_id).await?;
            Ok::<_, AppError>((community.privacy_level, updated))
        }
        .await;
        let (from, community) = finish(txn, result).await?;

        tracing::info!(
            "Changed privacy level of community {} from {} to {}",
            community_id,
            from,
            new_level
        );
        self.notify(CommunityEvent::PrivacyChanged {
            community_id,
            from,
            to: new_level,
        });

        Ok(community)
    }

    /// Fails if a related community would end up paired PRIVATE with PUBLIC.
    async fn check_related_privacy(
        &self,
        txn: &DatabaseTransaction,
        community_id: i32,
        new_level: PrivacyLevel,
    ) -> Result<(), AppError> {
        let conflicting = match new_level {
            PrivacyLevel::Private => PrivacyLevel::Public,
            PrivacyLevel::Public => PrivacyLevel::Private,
            PrivacyLevel::InvitationOnly => return Ok(()),
        };

        let related_ids = CommunityRelationshipRepository::new(txn)
            .neighbours(community_id)
            .await?;
        let related = CommunityRepository::new(txn).get_many(&related_ids).await?;

        match related
            .iter()
            .find(|other| other.privacy_level == conflicting)
        {
            Some(other) if new_level == PrivacyLevel::Private => {
                Err(BusinessRuleError::PrivacyIncompatible {
                    private_id: community_id,
                    public_id: other.id,
                }
                .into())
            }
            Some(other) => Err(BusinessRuleError::PrivacyIncompatible {
                private_id: other.id,
                public_id: community_id,
            }
            .into()),
            None => Ok(()),
        }
    }

    async fn assign_role(
        &self,
        txn: &DatabaseTransaction,
        community_id: i32,
        user_id: i32,
        role: &str,
        assigned_by: Option<i32>,
    ) -> Result<CommunityMember, AppError> {
        let community = self.require_community(txn, community_id).await?;
        if UserRepository::new(txn).get_by_id(user_id).await?.is_none() {
            return Err(AppError::not_found("user", user_id));
        }

        let assigned = match role.parse::<CommunityRole>() {
            Ok(parsed) => {
                RoleAssignment::new(txn, &self.quotas)
                    .assign(&community, user_id, parsed, assigned_by)
                    .await
            }
            Err(err) => Err(err),
        };

        assigned.map_err(|err| AppError::RoleAssignment {
            community_id,
            user_id,
            role: role.to_string(),
            source: Box::new(err),
        })
    }

    async fn require_community(
        &self,
        txn: &DatabaseTransaction,
        community_id: i32,
    ) -> Result<Community, AppError> {
        CommunityRepository::new(txn)
            .get_by_id(community_id)
            .await?
            .ok_or_else(|| AppError::not_found("community", community_id))
    }

    fn validate_name(&self, name: &str) -> Result<(), AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation(
                "Community name cannot be empty".to_string(),
            ));
        }

        let lowered = name.to_lowercase();
        if let Some(word) = self
            .config
            .restricted_names
            .iter()
            .find(|word| lowered.contains(word.to_lowercase().as_str()))
        {
            return Err(AppError::Validation(format!(
                "Community name contains restricted word '{}'",
                word
            )));
        }

        Ok(())
    }

    fn notify(&self, event: CommunityEvent) {
        if let Err(err) = self.notifier.notify(&event) {
            tracing::warn!("Failed to send community event {:?}: {}", event, err);
        }
    }
}

/// Commits `txn` if `result` is ok, otherwise rolls it back and returns the error.
async fn finish<T>(txn: DatabaseTransaction, result: Result<T, AppError>) -> Result<T, AppError> {
    match result {
        Ok(value) => {
            txn.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = txn.rollback().await {
                tracing::error!("Failed to roll back transaction: {}", rollback_err);
            }
            Err(err)
        }
    }
}

impl DomainService<Community, CreateCommunityParams, UpdateCommunityParams>
    for CommunityService<'_>
{
    async fn create(&self, args: CreateCommunityParams) -> Result<Community, AppError> {
        self.create_community(args).await
    }

    async fn get(&self, id: i32) -> Result<Community, AppError> {
        self.get_community(id).await
    }

    async fn update(&self, id: i32, args: UpdateCommunityParams) -> Result<Community, AppError> {
        self.update_community(id, args).await
    }

    async fn delete(&self, id: i32) -> Result<bool, AppError> {
        self.delete_community(id).await
    }
}
