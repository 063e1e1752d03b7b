//! Relationship factory for linking two communities.

use chrono::Utc;
use sea_orm::{ActiveValue, DatabaseConnection, DbErr, EntityTrait};

/// Inserts both directions of the edge `a <-> b`.
///
/// No graph rules are checked; tests use this to arrange a topology directly.
///
/// # Arguments
/// - `db` - Database connection
/// - `a` - First community id
/// - `b` - Second community id
///
/// # Returns
/// - `Ok(())` - Both rows inserted
/// - `Err(DbErr)` - Database error, including a duplicate edge
pub async fn create_relationship(db: &DatabaseConnection, a: i32, b: i32) -> Result<(), DbErr> {
    let now = Utc::now();
    let rows = [(a, b), (b, a)].map(|(from, to)| entity::community_relationship::ActiveModel {
        community_id: ActiveValue::Set(from),
        related_community_id: ActiveValue::Set(to),
        created_at: ActiveValue::Set(now),
    });

    entity::prelude::CommunityRelationship::insert_many(rows)
        .exec(db)
        .await?;

    Ok(())
}

/// Links consecutive ids into a chain: `ids[0] <-> ids[1] <-> ids[2] ...`.
pub async fn create_chain(db: &DatabaseConnection, ids: &[i32]) -> Result<(), DbErr> {
    for pair in ids.windows(2) {
        create_relationship(db, pair[0], pair[1]).await?;
    }

    Ok(())
}
