use crate::models::OrderStatus;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub order_no: String,
    pub user_id: i64,
    pub author_id: Option<i64>,
    pub company_id: Option<i64>,
    pub gross_amount: i64,
    pub total_discount: i64,
    pub final_amount: i64,
    pub instructor_share: i64,
    pub platform_share: i64,
    pub affiliate_share: i64,
    pub co_author_share: i64,
    pub affiliate_id: Option<i64>,
    pub status: OrderStatus,
    pub payment_method: Option<String>,
    pub transaction_id: Option<String>,
    pub is_deleted: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
