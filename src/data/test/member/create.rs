use super::*;

/// Tests inserting a pending invitation row.
///
/// Expected: Ok with the row in the invited state
#[tokio::test]
async fn creates_invited_row() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_community_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let (owner, community) = factory::create_community_with_owner(db).await?;
    let user = factory::create_user(db).await?;

    let repo = CommunityMemberRepository::new(db);
    let member = repo
        .create(NewMember {
            community_id: community.id,
            user_id: user.id,
            role: CommunityRole::Moderator,
            is_active: false,
            joined_at: None,
            role_assigned_at: None,
            role_assigned_by: Some(owner.id),
        })
        .await?;

    assert_eq!(member.state(), MembershipState::Invited);
    assert_eq!(member.role, CommunityRole::Moderator);
    assert_eq!(
        repo.get(community.id, user.id).await?.unwrap().role_assigned_by,
        Some(owner.id)
    );

    Ok(())
}

/// Tests inserting a second row for the same user and community.
///
/// Expected: Err from the composite primary key
#[tokio::test]
async fn fails_for_existing_pair() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_community_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let (owner, community) = factory::create_community_with_owner(db).await?;

    let result = CommunityMemberRepository::new(db)
        .create(NewMember {
            community_id: community.id,
            user_id: owner.id,
            role: CommunityRole::Member,
            is_active: true,
            joined_at: Some(Utc::now()),
            role_assigned_at: Some(Utc::now()),
            role_assigned_by: None,
        })
        .await;

    assert!(result.is_err());

    Ok(())
}
