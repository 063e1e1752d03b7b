use sea_orm::entity::prelude::*;

/// One direction of a symmetric community relationship.
///
/// Every edge is stored as two rows, (a, b) and (b, a).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "community_relationship")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub community_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub related_community_id: i32,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::community::Entity",
        from = "Column::CommunityId",
        to = "super::community::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Community,
    #[sea_orm(
        belongs_to = "super::community::Entity",
        from = "Column::RelatedCommunityId",
        to = "super::community::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    RelatedCommunity,
}

impl ActiveModelBehavior for ActiveModel {}
