use super::*;

/// Tests moving ownership while the expected owner is still stored.
///
/// Expected: Ok(true) with the new owner stored
#[tokio::test]
async fn moves_ownership_from_expected_owner() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_community_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let (owner, community) = factory::create_community_with_owner(db).await?;
    let next = factory::create_user(db).await?;

    let repo = CommunityRepository::new(db);
    assert!(repo.set_owner(community.id, owner.id, next.id).await?);

    let community = repo.get_by_id(community.id).await?.unwrap();
    assert_eq!(community.owner_id, next.id);

    Ok(())
}

/// Tests compare-and-set writers with a stale expectation.
///
/// Verifies that neither the owner nor the privacy level changes when the stored
/// value differs from the expected one.
///
/// Expected: Ok(false) for both writes
#[tokio::test]
async fn refuses_stale_owner_and_privacy() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_community_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let (owner, community) = factory::create_community_with_owner(db).await?;
    let other = factory::create_user(db).await?;

    let repo = CommunityRepository::new(db);
    let owner_written = repo.set_owner(community.id, other.id, other.id).await?;
    let privacy_written = repo
        .set_privacy_level(community.id, PrivacyLevel::Private, PrivacyLevel::Public)
        .await?;

    assert!(!owner_written);
    assert!(!privacy_written);
    let community = repo.get_by_id(community.id).await?.unwrap();
    assert_eq!(community.owner_id, owner.id);
    assert_eq!(community.privacy_level, PrivacyLevel::Public);

    Ok(())
}
