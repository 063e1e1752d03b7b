//! Community domain services.
//!
//! [`community::CommunityService`] is the façade: it opens one transaction per call and
//! hands it to the component that owns the rule being applied. The components are
//! generic over `ConnectionTrait` so they run on that transaction.

pub mod community;
pub mod membership;
pub mod notifier;
pub mod ownership;
pub mod privacy;
pub mod quota;
pub mod relationship;
pub mod role;

#[cfg(test)]
mod test;

use crate::error::AppError;

/// Basic lifecycle operations shared by domain services.
#[allow(async_fn_in_trait)]
pub trait DomainService<Model, CreateArgs, UpdateArgs> {
    async fn create(&self, args: CreateArgs) -> Result<Model, AppError>;

    async fn get(&self, id: i32) -> Result<Model, AppError>;

    async fn update(&self, id: i32, args: UpdateArgs) -> Result<Model, AppError>;

    /// Returns `false` if nothing with `id` existed.
    async fn delete(&self, id: i32) -> Result<bool, AppError>;
}
