use super::*;

/// Tests loading a user with their granted roles.
///
/// Verifies that inactive roles are dropped and the premium role is recognised.
///
/// Expected: Ok(Some) with only the active role names
#[tokio::test]
async fn loads_user_with_active_roles() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::create_user(db).await?;
    factory::grant_premium_role(db, user.id).await?;
    let retired = factory::role::RoleFactory::new(db)
        .name("beta_tester")
        .active(false)
        .build()
        .await?;
    factory::grant_role(db, user.id, retired.id).await?;

    let loaded = UserRepository::new(db).get_by_id(user.id).await?.unwrap();

    assert_eq!(loaded.roles, vec!["premium_user".to_string()]);
    assert!(loaded.has_premium_role());
    assert!(loaded.is_premium_tier());
    assert!(!loaded.is_premium);

    Ok(())
}

/// Tests loading a user that does not exist.
///
/// Expected: Ok(None)
#[tokio::test]
async fn returns_none_for_missing_user() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let loaded = UserRepository::new(db).get_by_id(12345).await?;

    assert!(loaded.is_none());

    Ok(())
}

/// Tests loading several users, including one without roles.
///
/// Expected: Ok with existing users in id order
#[tokio::test]
async fn loads_many_users_in_id_order() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let first = factory::create_user(db).await?;
    let second = factory::create_user(db).await?;

    let loaded = UserRepository::new(db)
        .get_many(&[second.id, 999, first.id])
        .await?;

    let ids: Vec<_> = loaded.iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![first.id, second.id]);
    assert!(loaded[0].roles.is_empty());

    Ok(())
}
