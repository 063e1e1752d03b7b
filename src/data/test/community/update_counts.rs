use super::*;

/// Tests writing counters when the stored values match.
///
/// Expected: Ok(true) and the new counters stored
#[tokio::test]
async fn writes_counts_when_expected_matches() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_community_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let (_, community) = factory::create_community_with_owner(db).await?;

    let repo = CommunityRepository::new(db);
    let written = repo.update_counts(community.id, (1, 1), (2, 2)).await?;

    assert!(written);
    let community = repo.get_by_id(community.id).await?.unwrap();
    assert_eq!(community.total_count, 2);
    assert_eq!(community.active_count, 2);

    Ok(())
}

/// Tests writing counters after they changed underneath the caller.
///
/// Expected: Ok(false) and the stored counters untouched
#[tokio::test]
async fn refuses_stale_counts() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_community_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let (_, community) = factory::create_community_with_owner(db).await?;
    factory::create_active_member(db, community.id, "member").await?;

    let repo = CommunityRepository::new(db);
    let written = repo.update_counts(community.id, (1, 1), (2, 2)).await?;

    assert!(!written);
    let community = repo.get_by_id(community.id).await?.unwrap();
    assert_eq!(community.total_count, 2);
    assert_eq!(community.active_count, 2);

    Ok(())
}
