//! Factory methods for creating test data.
//!
//! Each entity has a `Factory` builder for customization and a `create_*` shortcut
//! for quick default creation. Factories insert rows as given; they do not maintain
//! community counters. Use the helpers when a test needs counters that agree with
//! the member rows.
//!
//! # Basic Usage
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! let user = factory::create_user(db).await?;
//! let (owner, community) = factory::create_community_with_owner(db).await?;
//! let (moderator, _) = factory::create_active_member(db, community.id, "moderator").await?;
//! ```
//!
//! # Available Factories
//!
//! - `user` - Users
//! - `role` - Global roles and user role grants
//! - `community` - Communities
//! - `community_member` - Membership rows
//! - `community_relationship` - Symmetric relationship edges
//! - `helpers` - Entities created together with their dependencies

pub mod community;
pub mod community_member;
pub mod community_relationship;
pub mod helpers;
pub mod role;
pub mod user;

pub use community::create_community;
pub use community_member::create_member;
pub use community_relationship::create_relationship;
pub use helpers::{create_active_member, create_community_with_owner, grant_premium_role};
pub use role::{create_role, grant_role};
pub use user::create_user;
