use super::*;

/// Tests unlinking an existing edge.
///
/// Expected: Ok(2) and neither direction left
#[tokio::test]
async fn removes_both_directions() -> Result<(), DbErr> {
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
    let removed = repo.unlink(b.id, a.id).await?;

    assert_eq!(removed, 2);
    assert!(!repo.exists(a.id, b.id).await?);
    assert!(!repo.exists(b.id, a.id).await?);

    Ok(())
}

/// Tests unlinking an edge that does not exist.
///
/// Expected: Ok(0)
#[tokio::test]
async fn removes_nothing_for_absent_edge() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_community_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let (_, a) = factory::create_community_with_owner(db).await?;
    let (_, b) = factory::create_community_with_owner(db).await?;

    let removed = CommunityRelationshipRepository::new(db)
        .unlink(a.id, b.id)
        .await?;

    assert_eq!(removed, 0);

    Ok(())
}
