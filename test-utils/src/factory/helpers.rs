//! Shared helper utilities for factory methods.
//!
//! ID generation plus helpers that create entities together with the rows they
//! depend on, keeping community counters in step with membership rows.

use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter,
};

use crate::factory::{
    community::CommunityFactory,
    community_member::CommunityMemberFactory,
    role::{create_role, grant_role},
    user::create_user,
};

/// Counter for generating unique values in tests.
static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);

/// Gets the next unique counter value for test data.
///
/// # Returns
/// - `u64` - Next unique counter value
pub fn next_id() -> u64 {
    COUNTER.fetch_add(1, std::sync::atomic::Ordering::SeqCst)
}

/// Creates a user, a public community owned by them and the owner's membership row.
///
/// The community starts with `total_count = active_count = 1`.
///
/// # Returns
/// - `Ok((owner, community))` - Created owner and community
/// - `Err(DbErr)` - Database error during creation
pub async fn create_community_with_owner(
    db: &DatabaseConnection,
) -> Result<(entity::user::Model, entity::community::Model), DbErr> {
    let owner = create_user(db).await?;
    let community = create_owned_community(db, owner.id, "public").await?;

    Ok((owner, community))
}

/// Creates a community with the given privacy level owned by an existing user.
///
/// The owner's active `owner` membership is created alongside and counters start at 1.
pub async fn create_owned_community(
    db: &DatabaseConnection,
    owner_id: i32,
    privacy_level: &str,
) -> Result<entity::community::Model, DbErr> {
    let community = CommunityFactory::new(db, owner_id)
        .privacy_level(privacy_level)
        .counts(1, 1)
        .build()
        .await?;

    CommunityMemberFactory::new(db, community.id, owner_id)
        .role("owner")
        .build()
        .await?;

    Ok(community)
}

/// Creates a new user holding an active membership with `role`.
///
/// Both community counters are incremented.
///
/// # Returns
/// - `Ok((user, member))` - Created user and membership row
/// - `Err(DbErr)` - Database error, including a missing community
pub async fn create_active_member(
    db: &DatabaseConnection,
    community_id: i32,
    role: &str,
) -> Result<(entity::user::Model, entity::community_member::Model), DbErr> {
    let user = create_user(db).await?;
    let member = CommunityMemberFactory::new(db, community_id, user.id)
        .role(role)
        .build()
        .await?;

    adjust_counts(db, community_id, 1, 1).await?;

    Ok((user, member))
}

/// Adds `total` and `active` to a community's counters.
pub async fn adjust_counts(
    db: &DatabaseConnection,
    community_id: i32,
    total: i32,
    active: i32,
) -> Result<entity::community::Model, DbErr> {
    let community = entity::prelude::Community::find_by_id(community_id)
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("community {}", community_id)))?;

    let total_count = community.total_count + total;
    let active_count = community.active_count + active;
    let mut active_model = community.into_active_model();
    active_model.total_count = ActiveValue::Set(total_count);
    active_model.active_count = ActiveValue::Set(active_count);
    active_model.update(db).await
}

/// Grants the `premium_user` role to a user, creating the role on first use.
pub async fn grant_premium_role(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<entity::user_role::Model, DbErr> {
    let existing = entity::prelude::Role::find()
        .filter(entity::role::Column::Name.eq("premium_user"))
        .one(db)
        .await?;

    let role = match existing {
        Some(role) => role,
        None => create_role(db, "premium_user").await?,
    };

    grant_role(db, user_id, role.id).await
}
