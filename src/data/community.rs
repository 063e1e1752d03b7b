//! Community data repository.

use chrono::Utc;
use sea_orm::{
    sea_query::{Condition, Expr},
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::model::community::{
    Community, CommunitySearchParams, CreateCommunityParams, PrivacyLevel, UpdateCommunityParams,
};

/// Repository providing database operations for communities.
pub struct CommunityRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> CommunityRepository<'a, C> {
    /// Creates a new CommunityRepository instance.
    ///
    /// # Arguments
    /// - `db` - Connection or transaction the queries run on
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Inserts a new active community with both counters at zero.
    ///
    /// The caller creates the owner's membership and sets the counters afterwards.
    ///
    /// # Arguments
    /// - `params` - Name, description, owner and privacy level
    ///
    /// # Returns
    /// - `Ok(Community)` - The created community
    /// - `Err(DbErr)` - Database error, including a duplicate name or missing owner
    pub async fn create(&self, params: CreateCommunityParams) -> Result<Community, DbErr> {
        let now = Utc::now();
        let entity = entity::community::ActiveModel {
            name: ActiveValue::Set(params.name),
            description: ActiveValue::Set(params.description),
            owner_id: ActiveValue::Set(params.owner_id),
            privacy_level: ActiveValue::Set(params.privacy_level.as_str().to_string()),
            total_count: ActiveValue::Set(0),
            active_count: ActiveValue::Set(0),
            is_active: ActiveValue::Set(true),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Community::from_entity(entity)
    }

    /// Gets a community by id.
    ///
    /// # Returns
    /// - `Ok(Some(Community))` - Community found
    /// - `Ok(None)` - No community with that id
    /// - `Err(DbErr)` - Database error or unreadable stored value
    pub async fn get_by_id(&self, id: i32) -> Result<Option<Community>, DbErr> {
        entity::prelude::Community::find_by_id(id)
            .one(self.db)
            .await?
            .map(Community::from_entity)
            .transpose()
    }

    /// Gets several communities by id, in ascending id order. Missing ids are skipped.
    pub async fn get_many(&self, ids: &[i32]) -> Result<Vec<Community>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        entity::prelude::Community::find()
            .filter(entity::community::Column::Id.is_in(ids.iter().copied()))
            .order_by_asc(entity::community::Column::Id)
            .all(self.db)
            .await?
            .into_iter()
            .map(Community::from_entity)
            .collect()
    }

    /// Gets a community by its exact name.
    pub async fn get_by_name(&self, name: &str) -> Result<Option<Community>, DbErr> {
        entity::prelude::Community::find()
            .filter(entity::community::Column::Name.eq(name))
            .one(self.db)
            .await?
            .map(Community::from_entity)
            .transpose()
    }

    /// Updates a community's name, description and active flag.
    ///
    /// Fields left as `None` in `params` keep their stored value.
    ///
    /// # Returns
    /// - `Ok(Some(Community))` - The updated community
    /// - `Ok(None)` - No community with that id
    /// - `Err(DbErr)` - Database error, including a duplicate name
    pub async fn update(
        &self,
        id: i32,
        params: UpdateCommunityParams,
    ) -> Result<Option<Community>, DbErr> {
        let Some(entity) = entity::prelude::Community::find_by_id(id)
            .one(self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active_model = entity.into_active_model();
        if let Some(name) = params.name {
            active_model.name = ActiveValue::Set(name);
        }
        if let Some(description) = params.description {
            active_model.description = ActiveValue::Set(Some(description));
        }
        if let Some(is_active) = params.is_active {
            active_model.is_active = ActiveValue::Set(is_active);
        }
        active_model.updated_at = ActiveValue::Set(Utc::now());

        let entity = active_model.update(self.db).await?;

        Community::from_entity(entity).map(Some)
    }

    /// Deletes a community together with its membership rows and both directions of
    /// every relationship it takes part in.
    ///
    /// # Returns
    /// - `Ok(true)` - Community deleted
    /// - `Ok(false)` - No community with that id
    /// - `Err(DbErr)` - Database error during deletion
    pub async fn delete(&self, id: i32) -> Result<bool, DbErr> {
        entity::prelude::CommunityRelationship::delete_many()
            .filter(
                Condition::any()
                    .add(entity::community_relationship::Column::CommunityId.eq(id))
                    .add(entity::community_relationship::Column::RelatedCommunityId.eq(id)),
            )
            .exec(self.db)
            .await?;

        entity::prelude::CommunityMember::delete_many()
            .filter(entity::community_member::Column::CommunityId.eq(id))
            .exec(self.db)
            .await?;

        let result = entity::prelude::Community::delete_by_id(id)
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Counts the communities a user owns.
    ///
    /// # Arguments
    /// - `user_id` - Owner to count for
    /// - `active_only` - Skip deactivated communities
    pub async fn count_owned_by(&self, user_id: i32, active_only: bool) -> Result<u64, DbErr> {
        let mut query = entity::prelude::Community::find()
            .filter(entity::community::Column::OwnerId.eq(user_id));

        if active_only {
            query = query.filter(entity::community::Column::IsActive.eq(true));
        }

        query.count(self.db).await
    }

    /// Gets the communities a user is a member of, ordered by name.
    ///
    /// # Arguments
    /// - `user_id` - Member to look up
    /// - `active_only` - Only active memberships of active communities
    /// - `privacy_level` - Optional privacy level filter
    pub async fn get_user_communities(
        &self,
        user_id: i32,
        active_only: bool,
        privacy_level: Option<PrivacyLevel>,
    ) -> Result<Vec<Community>, DbErr> {
        let mut query = entity::prelude::Community::find()
            .inner_join(entity::prelude::CommunityMember)
            .filter(entity::community_member::Column::UserId.eq(user_id));

        if active_only {
            query = query
                .filter(entity::community::Column::IsActive.eq(true))
                .filter(entity::community_member::Column::IsActive.eq(true));
        }
        if let Some(level) = privacy_level {
            query = query.filter(entity::community::Column::PrivacyLevel.eq(level.as_str()));
        }

        query
            .order_by_asc(entity::community::Column::Name)
            .all(self.db)
            .await?
            .into_iter()
            .map(Community::from_entity)
            .collect()
    }

    /// Searches communities whose name or description contains the query.
    ///
    /// # Returns
    /// - `Ok((communities, total))` - One page ordered by name and the total match count
    /// - `Err(DbErr)` - Database error during query
    pub async fn search(
        &self,
        params: &CommunitySearchParams,
    ) -> Result<(Vec<Community>, u64), DbErr> {
        let mut query = entity::prelude::Community::find().filter(
            Condition::any()
                .add(entity::community::Column::Name.contains(params.query.as_str()))
                .add(entity::community::Column::Description.contains(params.query.as_str())),
        );

        if let Some(level) = params.privacy_level {
            query = query.filter(entity::community::Column::PrivacyLevel.eq(level.as_str()));
        }
        if params.active_only {
            query = query.filter(entity::community::Column::IsActive.eq(true));
        }

        let paginator = query
            .order_by_asc(entity::community::Column::Name)
            .paginate(self.db, params.per_page.max(1));

        let total = paginator.num_items().await?;
        let communities = paginator
            .fetch_page(params.page)
            .await?
            .into_iter()
            .map(Community::from_entity)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((communities, total))
    }

    /// Writes new member counters if the stored ones still equal `expected`.
    ///
    /// # Arguments
    /// - `id` - Community id
    /// - `expected` - `(total_count, active_count)` read earlier in the transaction
    /// - `counts` - `(total_count, active_count)` to store
    ///
    /// # Returns
    /// - `Ok(true)` - Counters written
    /// - `Ok(false)` - Stored counters changed since they were read
    /// - `Err(DbErr)` - Database error during update
    pub async fn update_counts(
        &self,
        id: i32,
        expected: (i32, i32),
        counts: (i32, i32),
    ) -> Result<bool, DbErr> {
        let result = entity::prelude::Community::update_many()
            .col_expr(entity::community::Column::TotalCount, Expr::value(counts.0))
            .col_expr(entity::community::Column::ActiveCount, Expr::value(counts.1))
            .col_expr(entity::community::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(entity::community::Column::Id.eq(id))
            .filter(entity::community::Column::TotalCount.eq(expected.0))
            .filter(entity::community::Column::ActiveCount.eq(expected.1))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }

    /// Moves ownership to `new_owner_id` if the stored owner is still `expected_owner_id`.
    pub async fn set_owner(
        &self,
        id: i32,
        expected_owner_id: i32,
        new_owner_id: i32,
    ) -> Result<bool, DbErr> {
        let result = entity::prelude::Community::update_many()
            .col_expr(entity::community::Column::OwnerId, Expr::value(new_owner_id))
            .col_expr(entity::community::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(entity::community::Column::Id.eq(id))
            .filter(entity::community::Column::OwnerId.eq(expected_owner_id))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }

    /// Changes the privacy level if the stored level is still `expected`.
    pub async fn set_privacy_level(
        &self,
        id: i32,
        expected: PrivacyLevel,
        new_level: PrivacyLevel,
    ) -> Result<bool, DbErr> {
        let result = entity::prelude::Community::update_many()
            .col_expr(
                entity::community::Column::PrivacyLevel,
                Expr::value(new_level.as_str()),
            )
            .col_expr(entity::community::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(entity::community::Column::Id.eq(id))
            .filter(entity::community::Column::PrivacyLevel.eq(expected.as_str()))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }
}
