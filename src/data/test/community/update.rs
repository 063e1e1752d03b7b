use super::*;

/// Tests a partial update.
///
/// Verifies that only the provided fields change.
///
/// Expected: Ok(Some) with the new description and the old name
#[tokio::test]
async fn updates_only_provided_fields() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_community_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let (_, community) = factory::create_community_with_owner(db).await?;

    let repo = CommunityRepository::new(db);
    let updated = repo
        .update(
            community.id,
            UpdateCommunityParams {
                description: Some("Now with a description".to_string()),
                ..Default::default()
            },
        )
        .await?
        .unwrap();

    assert_eq!(updated.name, community.name);
    assert_eq!(
        updated.description.as_deref(),
        Some("Now with a description")
    );
    assert!(updated.updated_at >= community.updated_at);

    Ok(())
}

/// Tests updating a community that does not exist.
///
/// Expected: Ok(None)
#[tokio::test]
async fn returns_none_for_missing_community() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_community_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let result = CommunityRepository::new(db)
        .update(999, UpdateCommunityParams::default())
        .await?;

    assert!(result.is_none());

    Ok(())
}
