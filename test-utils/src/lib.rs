//! Community Engine Test Utils
//!
//! Shared testing utilities for the community engine. Tests build an in-memory SQLite
//! database with the tables they need and seed it through the factories.
//!
//! # Overview
//!
//! - **TestBuilder**: Fluent builder for configuring test environments
//! - **TestContext**: Test environment holding the database connection
//! - **TestError**: Errors that can occur during test setup
//! - **factory**: Builders for users, roles, communities, members and relationships
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::builder::TestBuilder;
//!
//! #[tokio::test]
//! async fn test_community_operations() -> Result<(), TestError> {
//!     let test = TestBuilder::new().with_community_tables().build().await?;
//!     let db = test.db.as_ref().unwrap();
//!
//!     let (owner, community) = factory::create_community_with_owner(db).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod context;
pub mod error;
pub mod factory;
