use super::*;

/// Tests listing the rows a staff member assigned.
///
/// Expected: Ok with other members' rows assigned by the user, invitations included,
/// the user's own row and other assigners' rows left out
#[tokio::test]
async fn lists_rows_assigned_by_user() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_community_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let (owner, community) = factory::create_community_with_owner(db).await?;
    let moderator = factory::create_user(db).await?;
    factory::community_member::CommunityMemberFactory::new(db, community.id, moderator.id)
        .role("moderator")
        .assigned_by(moderator.id)
        .build()
        .await?;
    let promoted = factory::create_user(db).await?;
    factory::community_member::CommunityMemberFactory::new(db, community.id, promoted.id)
        .assigned_by(moderator.id)
        .build()
        .await?;
    let invited = factory::create_user(db).await?;
    factory::community_member::CommunityMemberFactory::new(db, community.id, invited.id)
        .invited(moderator.id)
        .build()
        .await?;
    let other = factory::create_user(db).await?;
    factory::community_member::CommunityMemberFactory::new(db, community.id, other.id)
        .assigned_by(owner.id)
        .build()
        .await?;

    let assigned = CommunityMemberRepository::new(db)
        .get_assigned_by(community.id, moderator.id)
        .await?;

    let ids: Vec<_> = assigned.iter().map(|m| m.user_id).collect();
    assert_eq!(ids, vec![promoted.id, invited.id]);
    assert_eq!(assigned[1].state(), MembershipState::Invited);

    Ok(())
}
