use super::*;

/// Tests linking two communities.
///
/// Verifies that both directions are stored and both degrees go up.
///
/// Expected: Ok with the edge visible from either side
#[tokio::test]
async fn stores_both_directions() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_community_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let (_, a) = factory::create_community_with_owner(db).await?;
    let (_, b) = factory::create_community_with_owner(db).await?;

    let repo = CommunityRelationshipRepository::new(db);
    repo.link(a.id, b.id).await?;

    assert!(repo.exists(a.id, b.id).await?);
    assert!(repo.exists(b.id, a.id).await?);
    assert_eq!(repo.degree(a.id).await?, 1);
    assert_eq!(repo.degree(b.id).await?, 1);

    Ok(())
}

/// Tests linking an edge that already exists.
///
/// Expected: Err from the primary key, nothing duplicated
#[tokio::test]
async fn fails_for_existing_edge() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_community_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let (_, a) = factory::create_community_with_owner(db).await?;
    let (_, b) = factory::create_community_with_owner(db).await?;
    factory::create_relationship(db, a.id, b.id).await?;

    let repo = CommunityRelationshipRepository::new(db);
    let result = repo.link(b.id, a.id).await;

    assert!(result.is_err());
    assert_eq!(repo.degree(a.id).await?, 1);

    Ok(())
}
