//! SeaORM entity definitions for the community engine schema.

pub mod prelude;

pub mod community;
pub mod community_member;
pub mod community_relationship;
pub mod role;
pub mod user;
pub mod user_role;
