pub use sea_orm_migration::prelude::*;

mod m20261002_000001_create_user_table;
mod m20261002_000002_create_role_table;
mod m20261002_000003_create_user_role_table;
mod m20261003_000004_create_community_table;
mod m20261003_000005_create_community_member_table;
mod m20261005_000006_create_community_relationship_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261002_000001_create_user_table::Migration),
            Box::new(m20261002_000002_create_role_table::Migration),
            Box::new(m20261002_000003_create_user_role_table::Migration),
            Box::new(m20261003_000004_create_community_table::Migration),
            Box::new(m20261003_000005_create_community_member_table::Migration),
            Box::new(m20261005_000006_create_community_relationship_table::Migration),
        ]
    }
}
