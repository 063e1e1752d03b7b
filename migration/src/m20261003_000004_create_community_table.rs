use sea_orm_migration::{prelude::*, schema::*};

use super::m20261002_000001_create_user_table::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Community::Table)
                    .if_not_exists()
                    .col(pk_auto(Community::Id))
                    .col(string_uniq(Community::Name))
                    .col(text_null(Community::Description))
                    .col(integer(Community::OwnerId))
                    .col(string(Community::PrivacyLevel).default("public"))
                    .col(integer(Community::TotalCount).default(0))
                    .col(integer(Community::ActiveCount).default(0))
                    .col(boolean(Community::IsActive).default(true))
                    .col(
                        timestamp_with_time_zone(Community::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(
                        timestamp_with_time_zone(Community::UpdatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .check(Expr::col(Community::ActiveCount).gte(0))
                    .check(Expr::col(Community::TotalCount).gte(Expr::col(Community::ActiveCount)))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_community_owner_id")
                            .from(Community::Table, Community::OwnerId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_community_owner_id")
                    .table(Community::Table)
                    .col(Community::OwnerId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Community::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Community {
    Table,
    Id,
    Name,
    Description,
    OwnerId,
    PrivacyLevel,
    TotalCount,
    ActiveCount,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
