use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "perfumes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub perfume_title: String,
    pub perfumer: String,
    pub year: Option<i32>,
    pub country: Option<String>,
    pub perfume_gender: String,
    pub fragrance_top_notes: Option<String>,
    pub fragrance_middle_notes: Option<String>,
    pub fragrance_base_notes: Option<String>,
    pub price: i32,
    pub volume: Option<String>,
    pub perfume_type: Option<String>,
    pub created_at: chrono::NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::order_item::Entity")]
    OrderItems,
}

impl Related<super::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
