use super::*;

/// Tests listing members with role and activity filters.
///
/// Expected: Ok with rows matching the filters in user id order
#[tokio::test]
async fn filters_by_role_and_activity() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_community_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let (_, community) = factory::create_community_with_owner(db).await?;
    let (first_mod, _) = factory::create_active_member(db, community.id, "moderator").await?;
    let (second_mod, _) = factory::create_active_member(db, community.id, "moderator").await?;
    factory::create_active_member(db, community.id, "member").await?;
    let former = factory::create_user(db).await?;
    factory::community_member::CommunityMemberFactory::new(db, community.id, former.id)
        .role("moderator")
        .inactive()
        .build()
        .await?;

    let repo = CommunityMemberRepository::new(db);
    let active_mods = repo
        .get_members(community.id, Some(CommunityRole::Moderator), true)
        .await?;
    let all_mods = repo
        .get_members(community.id, Some(CommunityRole::Moderator), false)
        .await?;
    let everyone = repo.get_members(community.id, None, false).await?;
    let mod_ids = repo
        .get_user_ids_by_role(community.id, CommunityRole::Moderator)
        .await?;

    assert_eq!(active_mods.len(), 2);
    assert_eq!(all_mods.len(), 3);
    assert_eq!(everyone.len(), 5);
    assert_eq!(mod_ids, vec![first_mod.id, second_mod.id]);

    Ok(())
}
