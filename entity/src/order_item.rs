use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "order_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub order_id: i32,
    pub perfume_id: i32,
    pub quantity: i32,
    /// Perfume price times quantity, fixed at checkout.
    pub amount: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::order::Entity",
        from = "Column::OrderId",
        to = "super::order::Column::Id"
    )]
    Order,
    #[sea_orm(
        belongs_to = "super::perfume::Entity",
        from = "Column::PerfumeId",
        to = "super::perfume::Column::Id"
    )]
    Perfume,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl Related<super::perfume::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Perfume.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
