use super::*;

/// Tests listing the communities of a member.
///
/// Verifies that inactive memberships are skipped when `active_only` is set and
/// that results are ordered by name.
///
/// Expected: Ok with the active communities in name order
#[tokio::test]
async fn lists_active_memberships_by_name() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_community_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let owner = factory::create_user(db).await?;
    let user = factory::create_user(db).await?;

    let zebra = factory::community::CommunityFactory::new(db, owner.id)
        .name("Zebra keepers")
        .build()
        .await?;
    let apple = factory::community::CommunityFactory::new(db, owner.id)
        .name("Apple growers")
        .build()
        .await?;
    let left = factory::community::CommunityFactory::new(db, owner.id)
        .name("Left behind")
        .build()
        .await?;
    factory::create_member(db, zebra.id, user.id).await?;
    factory::create_member(db, apple.id, user.id).await?;
    factory::community_member::CommunityMemberFactory::new(db, left.id, user.id)
        .inactive()
        .build()
        .await?;

    let repo = CommunityRepository::new(db);
    let active = repo.get_user_communities(user.id, true, None).await?;
    let all = repo.get_user_communities(user.id, false, None).await?;

    let names: Vec<_> = active.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Apple growers", "Zebra keepers"]);
    assert_eq!(all.len(), 3);

    Ok(())
}

/// Tests filtering the communities of a member by privacy level.
///
/// Expected: Ok with only the private community
#[tokio::test]
async fn filters_by_privacy_level() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_community_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let owner = factory::create_user(db).await?;

    let public = factory::create_community(db, owner.id).await?;
    let private = factory::community::CommunityFactory::new(db, owner.id)
        .privacy_level("private")
        .build()
        .await?;
    factory::create_member(db, public.id, owner.id).await?;
    factory::create_member(db, private.id, owner.id).await?;

    let result = CommunityRepository::new(db)
        .get_user_communities(owner.id, true, Some(PrivacyLevel::Private))
        .await?;

    assert_eq!(result.len(), 1);
    assert_eq!(result[0].id, private.id);

    Ok(())
}
