use sea_orm_migration::{prelude::*, schema::*};

use super::m20261003_000004_create_community_table::Community;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CommunityRelationship::Table)
                    .if_not_exists()
                    .col(integer(CommunityRelationship::CommunityId))
                    .col(integer(CommunityRelationship::RelatedCommunityId))
                    .col(
                        timestamp_with_time_zone(CommunityRelationship::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .name("pk_community_relationship")
                            .col(CommunityRelationship::CommunityId)
                            .col(CommunityRelationship::RelatedCommunityId),
                    )
                    .check(
                        Expr::col(CommunityRelationship::CommunityId)
                            .ne(Expr::col(CommunityRelationship::RelatedCommunityId)),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_community_relationship_community_id")
                            .from(
                                CommunityRelationship::Table,
                                CommunityRelationship::CommunityId,
                            )
                            .to(Community::Table, Community::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_community_relationship_related_community_id")
                            .from(
                                CommunityRelationship::Table,
                                CommunityRelationship::RelatedCommunityId,
                            )
                            .to(Community::Table, Community::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(CommunityRelationship::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
pub enum CommunityRelationship {
    Table,
    CommunityId,
    RelatedCommunityId,
    CreatedAt,
}
