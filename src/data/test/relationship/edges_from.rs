use super::*;

/// Tests reading neighbours in creation order.
///
/// Expected: Ok with neighbours in the order the edges were linked
#[tokio::test]
async fn returns_neighbours_in_creation_order() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_community_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let (_, hub) = factory::create_community_with_owner(db).await?;
    let (_, first) = factory::create_community_with_owner(db).await?;
    let (_, second) = factory::create_community_with_owner(db).await?;
    let (_, third) = factory::create_community_with_owner(db).await?;

    let repo = CommunityRelationshipRepository::new(db);
    repo.link(hub.id, third.id).await?;
    repo.link(hub.id, first.id).await?;
    repo.link(second.id, hub.id).await?;

    let neighbours = repo.neighbours(hub.id).await?;
    let edges = repo.edges_from(&[first.id, hub.id]).await?;

    assert_eq!(neighbours, vec![third.id, first.id, second.id]);
    assert_eq!(edges.len(), 4);
    assert!(edges.contains(&(first.id, hub.id)));

    Ok(())
}
