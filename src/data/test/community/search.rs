use super::*;

fn search(query: &str, page: u64, per_page: u64) -> CommunitySearchParams {
    CommunitySearchParams {
        query: query.to_string(),
        privacy_level: None,
        active_only: true,
        page,
        per_page,
    }
}

/// Tests searching by name and description.
///
/// Verifies that a match in either field is returned and that the total counts
/// every match, not just the page.
///
/// Expected: Ok with one page of matches and the full total
#[tokio::test]
async fn matches_name_or_description_and_paginates() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_community_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let owner = factory::create_user(db).await?;

    factory::community::CommunityFactory::new(db, owner.id)
        .name("Chess club")
        .build()
        .await?;
    factory::community::CommunityFactory::new(db, owner.id)
        .name("Board games")
        .description("Chess, go and more")
        .build()
        .await?;
    factory::community::CommunityFactory::new(db, owner.id)
        .name("Chess veterans")
        .build()
        .await?;
    factory::community::CommunityFactory::new(db, owner.id)
        .name("Running")
        .build()
        .await?;

    let repo = CommunityRepository::new(db);
    let (first_page, total) = repo.search(&search("Chess", 0, 2)).await?;
    let (second_page, _) = repo.search(&search("Chess", 1, 2)).await?;

    assert_eq!(total, 3);
    assert_eq!(first_page.len(), 2);
    assert_eq!(first_page[0].name, "Board games");
    assert_eq!(second_page.len(), 1);
    assert_eq!(second_page[0].name, "Chess veterans");

    Ok(())
}

/// Tests that inactive communities are hidden from an active-only search.
///
/// Expected: Ok with no results
#[tokio::test]
async fn skips_inactive_communities() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_community_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let owner = factory::create_user(db).await?;

    factory::community::CommunityFactory::new(db, owner.id)
        .name("Archived chess")
        .active(false)
        .build()
        .await?;

    let (communities, total) = CommunityRepository::new(db)
        .search(&search("chess", 0, 10))
        .await?;

    assert!(communities.is_empty());
    assert_eq!(total, 0);

    Ok(())
}
