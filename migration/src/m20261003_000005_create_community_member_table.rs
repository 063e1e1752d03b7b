use sea_orm_migration::{prelude::*, schema::*};

use super::m20261002_000001_create_user_table::User;
use super::m20261003_000004_create_community_table::Community;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CommunityMember::Table)
                    .if_not_exists()
                    .col(integer(CommunityMember::CommunityId))
                    .col(integer(CommunityMember::UserId))
                    .col(string_len(CommunityMember::Role, 50).default("member"))
                    .col(boolean(CommunityMember::IsActive).default(true))
                    .col(timestamp_with_time_zone_null(CommunityMember::JoinedAt))
                    .col(timestamp_with_time_zone_null(CommunityMember::RoleAssignedAt))
                    .col(integer_null(CommunityMember::RoleAssignedBy))
                    .col(
                        timestamp_with_time_zone(CommunityMember::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .name("pk_community_member")
                            .col(CommunityMember::CommunityId)
                            .col(CommunityMember::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_community_member_community_id")
                            .from(CommunityMember::Table, CommunityMember::CommunityId)
                            .to(Community::Table, Community::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_community_member_user_id")
                            .from(CommunityMember::Table, CommunityMember::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_community_member_role_assigned_by")
                            .from(CommunityMember::Table, CommunityMember::RoleAssignedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CommunityMember::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum CommunityMember {
    Table,
    CommunityId,
    UserId,
    Role,
    IsActive,
    JoinedAt,
    RoleAssignedAt,
    RoleAssignedBy,
    CreatedAt,
}
