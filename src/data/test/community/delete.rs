use super::*;
use sea_orm::{EntityTrait, PaginatorTrait};

/// Tests deleting a community that has members and relationships.
///
/// Verifies that membership rows and both directions of every edge go with it,
/// while the related community stays.
///
/// Expected: Ok(true) and no rows left referencing the community
#[tokio::test]
async fn deletes_members_and_both_edge_directions() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_community_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let (_, community) = factory::create_community_with_owner(db).await?;
    let (_, other) = factory::create_community_with_owner(db).await?;
    factory::create_active_member(db, community.id, "member").await?;
    factory::create_relationship(db, community.id, other.id).await?;

    let repo = CommunityRepository::new(db);
    let deleted = repo.delete(community.id).await?;

    assert!(deleted);
    assert!(repo.get_by_id(community.id).await?.is_none());
    assert!(repo.get_by_id(other.id).await?.is_some());
    assert_eq!(
        entity::prelude::CommunityRelationship::find().count(db).await?,
        0
    );
    assert_eq!(entity::prelude::CommunityMember::find().count(db).await?, 1);

    Ok(())
}

/// Tests deleting a community that does not exist.
///
/// Expected: Ok(false)
#[tokio::test]
async fn returns_false_for_missing_community() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_community_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let deleted = CommunityRepository::new(db).delete(42).await?;

    assert!(!deleted);

    Ok(())
}
