use crate::models::{InstrumentKind, ItemType};
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "discount_instruments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub kind: InstrumentKind,
    pub code: String,
    pub is_active: bool,
    pub item_type: ItemType,
    pub book_id: Option<i64>,
    pub course_id: Option<i64>,
    pub event_id: Option<i64>,
    pub discount_percent: i32,
    pub expires_at: DateTime<Utc>,
    pub max_usage: Option<i64>,
    pub used_count: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
