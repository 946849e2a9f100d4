use crate::entities::{order_entity, order_item_entity};
use chrono::{DateTime, Utc};
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// What a cart line (or a discount target) points at. Bundles can be
/// purchased but never targeted by a discount instrument.
#[derive(
    Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "item_type")]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    #[sea_orm(string_value = "book")]
    Book,
    #[sea_orm(string_value = "course")]
    Course,
    #[sea_orm(string_value = "bundle")]
    Bundle,
    #[sea_orm(string_value = "event")]
    Event,
}

impl std::fmt::Display for ItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemType::Book => write!(f, "book"),
            ItemType::Course => write!(f, "course"),
            ItemType::Bundle => write!(f, "bundle"),
            ItemType::Event => write!(f, "event"),
        }
    }
}

/// Stored for the payment flow elsewhere; this engine only ever writes
/// `pending` at creation.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "order_status")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "paid")]
    Paid,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "pending"),
            OrderStatus::Paid => write!(f, "paid"),
            OrderStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderItemResponse {
    pub id: i64,
    pub item_type: ItemType,
    pub reference_id: i64,
    pub base_price: i64,
    pub discount_amount: i64,
    pub final_price: i64,
    pub quantity: i32,
}

impl From<order_item_entity::Model> for OrderItemResponse {
    fn from(m: order_item_entity::Model) -> Self {
        let reference_id = m
            .book_id
            .or(m.course_id)
            .or(m.bundle_id)
            .or(m.event_id)
            .unwrap_or(0);
        Self {
            id: m.id,
            item_type: m.item_type,
            reference_id,
            base_price: m.base_price,
            discount_amount: m.discount_amount,
            final_price: m.final_price,
            quantity: m.quantity,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderResponse {
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
    pub created_at: DateTime<Utc>,
}

impl From<order_entity::Model> for OrderResponse {
    fn from(m: order_entity::Model) -> Self {
        Self {
            id: m.id,
            order_no: m.order_no,
            user_id: m.user_id,
            author_id: m.author_id,
            company_id: m.company_id,
            gross_amount: m.gross_amount,
            total_discount: m.total_discount,
            final_amount: m.final_amount,
            instructor_share: m.instructor_share,
            platform_share: m.platform_share,
            affiliate_share: m.affiliate_share,
            co_author_share: m.co_author_share,
            affiliate_id: m.affiliate_id,
            status: m.status,
            created_at: m.created_at.unwrap_or_else(Utc::now),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderDetailResponse {
    #[serde(flatten)]
    pub order: OrderResponse,
    pub co_author_ids: Vec<i64>,
    pub items: Vec<OrderItemResponse>,
}

impl OrderDetailResponse {
    pub fn new(
        order: order_entity::Model,
        items: Vec<order_item_entity::Model>,
        co_author_ids: Vec<i64>,
    ) -> Self {
        Self {
            order: OrderResponse::from(order),
            co_author_ids,
            items: items.into_iter().map(OrderItemResponse::from).collect(),
        }
    }
}
