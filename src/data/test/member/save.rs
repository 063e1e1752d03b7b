use super::*;

/// Tests activating an invited row.
///
/// Expected: Ok(true) and the row stored as active
#[tokio::test]
async fn activates_row_when_flag_matches() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_community_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let (owner, community) = factory::create_community_with_owner(db).await?;
    let user = factory::create_user(db).await?;
    factory::community_member::CommunityMemberFactory::new(db, community.id, user.id)
        .invited(owner.id)
        .build()
        .await?;

    let repo = CommunityMemberRepository::new(db);
    let mut member = repo.get(community.id, user.id).await?.unwrap();
    let now = Utc::now();
    member.is_active = true;
    member.joined_at = Some(now);
    member.role_assigned_at = Some(now);

    assert!(repo.save(false, &member).await?);

    let stored = repo.get(community.id, user.id).await?.unwrap();
    assert_eq!(stored.state(), MembershipState::Active);
    assert!(stored.has_joined());

    Ok(())
}

/// Tests saving a row whose active flag changed since it was read.
///
/// Expected: Ok(false) and the stored row untouched
#[tokio::test]
async fn refuses_stale_active_flag() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_community_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let (_, community) = factory::create_community_with_owner(db).await?;
    let (user, _) = factory::create_active_member(db, community.id, "member").await?;

    let repo = CommunityMemberRepository::new(db);
    let mut member = repo.get(community.id, user.id).await?.unwrap();
    member.role = CommunityRole::Admin;

    assert!(!repo.save(false, &member).await?);
    assert_eq!(
        repo.get(community.id, user.id).await?.unwrap().role,
        CommunityRole::Member
    );

    Ok(())
}

/// Tests that only inactive rows can be deleted.
///
/// Expected: Ok(false) for the active row, Ok(true) for the invitation
#[tokio::test]
async fn deletes_only_inactive_rows() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_community_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let (owner, community) = factory::create_community_with_owner(db).await?;
    let invited = factory::create_user(db).await?;
    factory::community_member::CommunityMemberFactory::new(db, community.id, invited.id)
        .invited(owner.id)
        .build()
        .await?;

    let repo = CommunityMemberRepository::new(db);

    assert!(!repo.delete_inactive(community.id, owner.id).await?);
    assert!(repo.delete_inactive(community.id, invited.id).await?);
    assert!(repo.get(community.id, invited.id).await?.is_none());

    Ok(())
}
