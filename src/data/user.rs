//! User data repository.
//!
//! Read-only access to users and the global roles granted to them.

use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder};

use crate::model::user::User;

pub struct UserRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> UserRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Gets a user by id together with their active roles.
    ///
    /// # Returns
    /// - `Ok(Some(User))` - User found
    /// - `Ok(None)` - No user with that id
    /// - `Err(DbErr)` - Database error during query
    pub async fn get_by_id(&self, id: i32) -> Result<Option<User>, DbErr> {
        Ok(self.get_many(&[id]).await?.into_iter().next())
    }

    /// Gets several users with their roles, in ascending id order. Missing ids are skipped.
    pub async fn get_many(&self, ids: &[i32]) -> Result<Vec<User>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let users = entity::prelude::User::find()
            .filter(entity::user::Column::Id.is_in(ids.iter().copied()))
            .order_by_asc(entity::user::Column::Id)
            .find_with_related(entity::prelude::Role)
            .all(self.db)
            .await?;

        Ok(users
            .into_iter()
            .map(|(user, roles)| User::from_entity(user, roles))
            .collect())
    }
}
