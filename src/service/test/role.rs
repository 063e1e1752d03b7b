use super::*;

/// Tests the owner promoting a member.
///
/// Expected: Ok with the new role and the owner recorded as assigner
#[tokio::test]
async fn owner_promotes_member() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_community_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let config = EngineConfig::default();
    let notifier = RecordingNotifier::default();
    let service = CommunityService::new(db, &config, &notifier);
    let (owner, community) = factory::create_community_with_owner(db).await?;
    let (user, _) = factory::create_active_member(db, community.id, "member").await?;

    let member = service
        .manage_member_roles(community.id, user.id, "moderator", Some(owner.id))
        .await?;

    assert_eq!(member.role, CommunityRole::Moderator);
    assert_eq!(member.role_assigned_by, Some(owner.id));
    assert!(member.is_active);
    assert_eq!(
        notifier.events(),
        vec![CommunityEvent::RoleAssigned {
            community_id: community.id,
            user_id: user.id,
            role: CommunityRole::Moderator,
            assigned_by: Some(owner.id),
        }]
    );

    Ok(())
}

/// Tests a moderator assigning a role above their own reach.
///
/// Expected: Err(RoleAssignment) wrapping Err(AccessDenied)
#[tokio::test]
async fn moderator_cannot_assign_admin() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_community_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let config = EngineConfig::default();
    let notifier = RecordingNotifier::default();
    let service = CommunityService::new(db, &config, &notifier);
    let (_, community) = factory::create_community_with_owner(db).await?;
    let (moderator, _) = factory::create_active_member(db, community.id, "moderator").await?;
    let (user, _) = factory::create_active_member(db, community.id, "member").await?;

    let err = service
        .manage_member_roles(community.id, user.id, "admin", Some(moderator.id))
        .await
        .unwrap_err();

    match err {
        AppError::RoleAssignment {
            user_id,
            role,
            source,
            ..
        } => {
            assert_eq!(user_id, user.id);
            assert_eq!(role, "admin");
            assert_eq!(source.kind(), ErrorKind::AccessDenied);
        }
        other => panic!("unexpected error: {:?}", other),
    }
    let row = CommunityMemberRepository::new(db)
        .get(community.id, user.id)
        .await?
        .unwrap();
    assert_eq!(row.role, CommunityRole::Member);

    Ok(())
}

/// Tests role values that are never assignable through role management.
///
/// Expected: Err(RoleAssignment) wrapping Validation for an unknown role, Err(RoleAssignment)
/// for owner and for changing the owner's own role, Err(NotFound) for a missing user
#[tokio::test]
async fn owner_role_only_moves_by_transfer() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_community_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let config = EngineConfig::default();
    let notifier = RecordingNotifier::default();
    let service = CommunityService::new(db, &config, &notifier);
    let (owner, community) = factory::create_community_with_owner(db).await?;
    let (user, _) = factory::create_active_member(db, community.id, "admin").await?;

    let result = service
        .manage_member_roles(community.id, user.id, "superuser", Some(owner.id))
        .await;
    match result.unwrap_err() {
        AppError::RoleAssignment { role, source, .. } => {
            assert_eq!(role, "superuser");
            assert_eq!(source.kind(), ErrorKind::Validation);
        }
        other => panic!("unexpected error: {:?}", other),
    }

    let result = service
        .manage_member_roles(community.id, user.id, "owner", Some(owner.id))
        .await;
    assert_eq!(result.unwrap_err().kind(), ErrorKind::RoleAssignment);

    let result = service
        .manage_member_roles(community.id, owner.id, "member", None)
        .await;
    assert_eq!(result.unwrap_err().kind(), ErrorKind::RoleAssignment);

    let result = service
        .manage_member_roles(community.id, 9999, "member", Some(owner.id))
        .await;
    assert_eq!(result.unwrap_err().kind(), ErrorKind::NotFound);

    Ok(())
}

/// Tests assigning a role to a user without a membership row.
///
/// Expected: Ok with a new active row and both counters incremented
#[tokio::test]
async fn assignment_creates_active_membership() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_community_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let config = EngineConfig::default();
    let notifier = RecordingNotifier::default();
    let service = CommunityService::new(db, &config, &notifier);
    let (owner, community) = factory::create_community_with_owner(db).await?;
    let user = factory::create_user(db).await?;

    let member = service
        .manage_member_roles(community.id, user.id, "admin", Some(owner.id))
        .await?;

    assert_eq!(member.state(), MembershipState::Active);
    let stored = service.get_community(community.id).await?;
    assert_eq!((stored.total_count, stored.active_count), (2, 2));
    assert_counters_match(&service, community.id).await?;

    Ok(())
}

/// Tests that a failing entry rolls back the whole bulk update.
///
/// Expected: Err and the earlier assignment in the batch is not stored
#[tokio::test]
async fn bulk_update_is_all_or_nothing() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_community_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let config = EngineConfig::default();
    let notifier = RecordingNotifier::default();
    let service = CommunityService::new(db, &config, &notifier);
    let (owner, community) = factory::create_community_with_owner(db).await?;
    let (first, _) = factory::create_active_member(db, community.id, "member").await?;
    let (second, _) = factory::create_active_member(db, community.id, "member").await?;

    let result = service
        .bulk_update_member_roles(
            community.id,
            &[(first.id, "moderator"), (owner.id, "member")],
            owner.id,
        )
        .await;
    assert_eq!(result.unwrap_err().kind(), ErrorKind::RoleAssignment);

    let roles = service.get_member_roles(community.id, None, true).await?;
    assert!(roles.contains(&(first.id, CommunityRole::Member)));
    assert!(notifier.events().is_empty());

    let result = service
        .bulk_update_member_roles(
            community.id,
            &[(first.id, "moderator"), (second.id, "superuser")],
            owner.id,
        )
        .await;
    assert_eq!(result.unwrap_err().kind(), ErrorKind::RoleAssignment);

    let roles = service.get_member_roles(community.id, None, true).await?;
    assert!(roles.contains(&(first.id, CommunityRole::Member)));
    assert!(notifier.events().is_empty());

    let done = service
        .bulk_update_member_roles(
            community.id,
            &[(first.id, "moderator"), (second.id, "admin")],
            owner.id,
        )
        .await?;
    assert!(done);

    let moderators = service
        .get_member_roles(community.id, Some("moderator"), true)
        .await?;
    assert_eq!(moderators, vec![(first.id, CommunityRole::Moderator)]);
    assert_eq!(notifier.events().len(), 2);

    Ok(())
}

/// Tests listing the users who hold a role.
///
/// Expected: Ok with the active holders only, in id order
#[tokio::test]
async fn lists_members_by_role() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_community_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let config = EngineConfig::default();
    let notifier = RecordingNotifier::default();
    let service = CommunityService::new(db, &config, &notifier);
    let (_, community) = factory::create_community_with_owner(db).await?;
    let (first, _) = factory::create_active_member(db, community.id, "moderator").await?;
    let (second, _) = factory::create_active_member(db, community.id, "moderator").await?;
    let former = factory::create_user(db).await?;
    factory::community_member::CommunityMemberFactory::new(db, community.id, former.id)
        .role("moderator")
        .inactive()
        .build()
        .await?;

    let users = service
        .get_members_by_role(community.id, "moderator")
        .await?;

    let ids: Vec<i32> = users.iter().map(|user| user.id).collect();
    assert_eq!(ids, vec![first.id, second.id]);

    let result = service.get_members_by_role(community.id, "king").await;
    assert_eq!(result.unwrap_err().kind(), ErrorKind::Validation);

    Ok(())
}

/// Tests the activity summary of a moderator and of a member they invited.
///
/// Expected: Ok with moderation figures for the moderator only, Err(NotFound) for a
/// user without a membership
#[tokio::test]
async fn member_activity_reports_staff_assignments() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_community_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let config = EngineConfig::default();
    let notifier = RecordingNotifier::default();
    let service = CommunityService::new(db, &config, &notifier);
    let (_, community) = factory::create_community_with_owner(db).await?;
    let (moderator, _) = factory::create_active_member(db, community.id, "moderator").await?;
    let invitee = factory::create_user(db).await?;
    let stranger = factory::create_user(db).await?;

    service
        .manage_membership(community.id, invitee.id, "invite", Some(moderator.id), None)
        .await?;

    let staff = service.get_member_activity(community.id, moderator.id).await?;
    assert_eq!(staff.current_role, CommunityRole::Moderator);
    assert!(staff.is_active);
    assert!(staff.member_since.is_some());
    let moderation = staff.moderation.unwrap();
    assert_eq!(moderation.managed_members, 1);
    assert_eq!(moderation.active_managed_members, 0);
    assert_eq!(moderation.recent_actions[0].user_id, invitee.id);

    let invited = service.get_member_activity(community.id, invitee.id).await?;
    assert_eq!(invited.current_role, CommunityRole::Member);
    assert!(!invited.is_active);
    assert!(invited.member_since.is_none());
    assert_eq!(invited.role_history[0].assigned_by, Some(moderator.id));
    assert!(invited.moderation.is_none());

    let result = service.get_member_activity(community.id, stranger.id).await;
    assert_eq!(result.unwrap_err().kind(), ErrorKind::NotFound);

    Ok(())
}
