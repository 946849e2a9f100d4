use crate::models::ItemType;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "order_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub order_id: i64,
    pub item_type: ItemType,
    pub book_id: Option<i64>,
    pub course_id: Option<i64>,
    pub bundle_id: Option<i64>,
    pub event_id: Option<i64>,
    pub base_price: i64,
    pub discount_amount: i64,
    pub final_price: i64,
    pub quantity: i32,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
