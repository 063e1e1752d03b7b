use super::*;

/// Tests creating a community.
///
/// Verifies that the repository stores the given fields, starts both counters at
/// zero and marks the community active.
///
/// Expected: Ok with the created community
#[tokio::test]
async fn creates_community_with_zeroed_counters() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_community_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let owner = factory::create_user(db).await?;

    let repo = CommunityRepository::new(db);
    let community = repo
        .create(CreateCommunityParams {
            name: "Gardeners".to_string(),
            description: Some("Plants".to_string()),
            owner_id: owner.id,
            privacy_level: PrivacyLevel::Private,
        })
        .await?;

    assert_eq!(community.name, "Gardeners");
    assert_eq!(community.owner_id, owner.id);
    assert_eq!(community.privacy_level, PrivacyLevel::Private);
    assert_eq!(community.total_count, 0);
    assert_eq!(community.active_count, 0);
    assert!(community.is_active);

    Ok(())
}

/// Tests creating a community with a name that is already used.
///
/// Expected: Err from the unique constraint
#[tokio::test]
async fn fails_for_duplicate_name() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_community_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let owner = factory::create_user(db).await?;

    let repo = CommunityRepository::new(db);
    let params = CreateCommunityParams {
        name: "Gardeners".to_string(),
        description: None,
        owner_id: owner.id,
        privacy_level: PrivacyLevel::Public,
    };
    repo.create(params.clone()).await?;

    let result = repo.create(params).await;

    assert!(result.is_err());

    Ok(())
}

/// Tests reading a community whose stored privacy level is unknown.
///
/// Expected: Err(DbErr::Custom)
#[tokio::test]
async fn rejects_unknown_stored_privacy_level() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_community_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let owner = factory::create_user(db).await?;
    let community = factory::community::CommunityFactory::new(db, owner.id)
        .privacy_level("secret")
        .build()
        .await?;

    let result = CommunityRepository::new(db).get_by_id(community.id).await;

    assert!(matches!(result, Err(DbErr::Custom(_))));

    Ok(())
}
