//! Community relationship data repository.
//!
//! Edges are symmetric and stored as two rows. Only `link` and `unlink` write to the
//! table, and both always touch the pair.

use chrono::Utc;
use sea_orm::{
    sea_query::Condition, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

pub struct CommunityRelationshipRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> CommunityRelationshipRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Inserts both directions of the edge `a <-> b`.
    ///
    /// # Returns
    /// - `Ok(())` - Both rows inserted
    /// - `Err(DbErr)` - Database error, including an existing row for either direction
    pub async fn link(&self, a: i32, b: i32) -> Result<(), DbErr> {
        let now = Utc::now();
        let rows = [(a, b), (b, a)].map(|(from, to)| entity::community_relationship::ActiveModel {
            community_id: ActiveValue::Set(from),
            related_community_id: ActiveValue::Set(to),
            created_at: ActiveValue::Set(now),
        });

        entity::prelude::CommunityRelationship::insert_many(rows)
            .exec(self.db)
            .await?;

        Ok(())
    }

    /// Deletes both directions of the edge `a <-> b`.
    ///
    /// # Returns
    /// - `Ok(rows)` - Number of rows deleted; 2 for a consistent edge, 0 when absent
    /// - `Err(DbErr)` - Database error during deletion
    pub async fn unlink(&self, a: i32, b: i32) -> Result<u64, DbErr> {
        let result = entity::prelude::CommunityRelationship::delete_many()
            .filter(
                Condition::any()
                    .add(
                        Condition::all()
                            .add(entity::community_relationship::Column::CommunityId.eq(a))
                            .add(entity::community_relationship::Column::RelatedCommunityId.eq(b)),
                    )
                    .add(
                        Condition::all()
                            .add(entity::community_relationship::Column::CommunityId.eq(b))
                            .add(entity::community_relationship::Column::RelatedCommunityId.eq(a)),
                    ),
            )
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }

    pub async fn exists(&self, a: i32, b: i32) -> Result<bool, DbErr> {
        let row = entity::prelude::CommunityRelationship::find_by_id((a, b))
            .one(self.db)
            .await?;

        Ok(row.is_some())
    }

    /// Counts the relationships of a community.
    pub async fn degree(&self, community_id: i32) -> Result<u64, DbErr> {
        entity::prelude::CommunityRelationship::find()
            .filter(entity::community_relationship::Column::CommunityId.eq(community_id))
            .count(self.db)
            .await
    }

    /// Gets the neighbours of a community in the order the edges were created.
    pub async fn neighbours(&self, community_id: i32) -> Result<Vec<i32>, DbErr> {
        Ok(self
            .edges_from(&[community_id])
            .await?
            .into_iter()
            .map(|(_, to)| to)
            .collect())
    }

    /// Gets every stored direction leaving one of `ids`.
    ///
    /// # Returns
    /// - `Ok(edges)` - `(community_id, related_community_id)` pairs ordered by source,
    ///   then creation time, then related id
    /// - `Err(DbErr)` - Database error during query
    pub async fn edges_from(&self, ids: &[i32]) -> Result<Vec<(i32, i32)>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        entity::prelude::CommunityRelationship::find()
            .select_only()
            .column(entity::community_relationship::Column::CommunityId)
            .column(entity::community_relationship::Column::RelatedCommunityId)
            .filter(entity::community_relationship::Column::CommunityId.is_in(ids.iter().copied()))
            .order_by_asc(entity::community_relationship::Column::CommunityId)
            .order_by_asc(entity::community_relationship::Column::CreatedAt)
            .order_by_asc(entity::community_relationship::Column::RelatedCommunityId)
            .into_tuple::<(i32, i32)>()
            .all(self.db)
            .await
    }
}
