use super::*;

/// Tests detection of a user who is staff in both communities.
///
/// Expected: Ok(true)
#[tokio::test]
async fn detects_shared_staff_member() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_community_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let (_, first) = factory::create_community_with_owner(db).await?;
    let (_, second) = factory::create_community_with_owner(db).await?;
    let (user, _) = factory::create_active_member(db, first.id, "admin").await?;
    factory::community_member::CommunityMemberFactory::new(db, second.id, user.id)
        .role("moderator")
        .build()
        .await?;

    let shared = CommunityMemberRepository::new(db)
        .has_shared_staff(first.id, second.id)
        .await?;

    assert!(shared);

    Ok(())
}

/// Tests that plain members and inactive staff are not shared resources.
///
/// Expected: Ok(false)
#[tokio::test]
async fn ignores_plain_and_inactive_members() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_community_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let (_, first) = factory::create_community_with_owner(db).await?;
    let (_, second) = factory::create_community_with_owner(db).await?;

    let (plain, _) = factory::create_active_member(db, first.id, "member").await?;
    factory::community_member::CommunityMemberFactory::new(db, second.id, plain.id)
        .role("admin")
        .build()
        .await?;
    let (retired, _) = factory::create_active_member(db, first.id, "admin").await?;
    factory::community_member::CommunityMemberFactory::new(db, second.id, retired.id)
        .role("admin")
        .inactive()
        .build()
        .await?;

    let shared = CommunityMemberRepository::new(db)
        .has_shared_staff(first.id, second.id)
        .await?;

    assert!(!shared);

    Ok(())
}
