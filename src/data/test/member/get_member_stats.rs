use super::*;

/// Tests member aggregates over rows in every state.
///
/// Verifies that former members count towards the total, invitations count only
/// as pending, and active rows count as active.
///
/// Expected: Ok with total 3, active 2, pending 1
#[tokio::test]
async fn aggregates_rows_by_state() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_community_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let (owner, community) = factory::create_community_with_owner(db).await?;
    factory::create_active_member(db, community.id, "member").await?;

    let former = factory::create_user(db).await?;
    factory::community_member::CommunityMemberFactory::new(db, community.id, former.id)
        .inactive()
        .build()
        .await?;
    let invited = factory::create_user(db).await?;
    factory::community_member::CommunityMemberFactory::new(db, community.id, invited.id)
        .invited(owner.id)
        .build()
        .await?;

    let stats = CommunityMemberRepository::new(db)
        .get_member_stats(community.id)
        .await?;

    assert_eq!(stats.total_members, 3);
    assert_eq!(stats.active_members, 2);
    assert_eq!(stats.pending_invitations, 1);

    Ok(())
}
