//! Database repository layer.
//!
//! Repository structs wrap SeaORM queries for each table the community engine touches and
//! return domain models from `crate::model`. Every repository is generic over
//! `ConnectionTrait`, so the service can run all of a request's reads and writes on one
//! `DatabaseTransaction`. Writes that guard against concurrent changes return `bool` and
//! report `false` when the expected row state was no longer there.

pub mod community;
pub mod member;
pub mod relationship;
pub mod user;

#[cfg(test)]
mod test;
