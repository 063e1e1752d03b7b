use entity::prelude::*;
use sea_orm::{sea_query::TableCreateStatement, EntityTrait, Schema};

use crate::{context::TestContext, error::TestError};

/// Builder for creating test contexts with customizable database schemas.
///
/// Add entity tables with `with_table()` in dependency order, then call `build()`
/// to create the in-memory database.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::builder::TestBuilder;
/// use entity::prelude::{User, Role};
///
/// let test = TestBuilder::new()
///     .with_table(User)
///     .with_table(Role)
///     .build()
///     .await?;
/// ```
pub struct TestBuilder {
    /// CREATE TABLE statements executed in insertion order during `build()`.
    tables: Vec<TableCreateStatement>,
}

impl Default for TestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestBuilder {
    /// Creates a new test builder with no tables configured.
    pub fn new() -> Self {
        Self { tables: Vec::new() }
    }

    /// Adds an entity table to the test database schema.
    ///
    /// Tables referencing other tables through foreign keys must be added after the
    /// tables they reference.
    ///
    /// # Arguments
    /// - `entity` - SeaORM entity to create the table for
    ///
    /// # Returns
    /// - `Self` - Builder instance for method chaining
    pub fn with_table<E: EntityTrait>(mut self, entity: E) -> Self {
        let schema = Schema::new(sea_orm::DbBackend::Sqlite);
        self.tables.push(schema.create_table_from_entity(entity));
        self
    }

    /// Adds the user and role tables.
    ///
    /// Use this for tests that only look up users and their roles.
    ///
    /// # Returns
    /// - `Self` - Builder instance for method chaining
    pub fn with_user_tables(self) -> Self {
        self.with_table(User).with_table(Role).with_table(UserRole)
    }

    /// Adds every table the community engine touches.
    ///
    /// Tables are added in dependency order:
    /// - User, Role, UserRole
    /// - Community
    /// - CommunityMember
    /// - CommunityRelationship
    ///
    /// # Returns
    /// - `Self` - Builder instance for method chaining
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let test = TestBuilder::new()
    ///     .with_community_tables()
    ///     .build()
    ///     .await?;
    /// ```
    pub fn with_community_tables(self) -> Self {
        self.with_user_tables()
            .with_table(Community)
            .with_table(CommunityMember)
            .with_table(CommunityRelationship)
    }

    /// Builds the test context and creates the configured tables.
    ///
    /// # Returns
    /// - `Ok(TestContext)` - Initialized test context with tables ready
    /// - `Err(TestError::Database)` - Failed to connect or create tables
    pub async fn build(self) -> Result<TestContext, TestError> {
        let mut setup = TestContext::new();

        setup.with_tables(self.tables).await?;

        Ok(setup)
    }
}
