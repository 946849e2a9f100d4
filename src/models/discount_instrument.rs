use crate::entities::discount_instrument_entity;
use crate::models::ItemType;
use chrono::{DateTime, Utc};
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Coupons and promo codes share validation and consumption semantics;
/// they differ only in the revenue-split branch they trigger.
#[derive(
    Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "instrument_kind")]
#[serde(rename_all = "snake_case")]
pub enum InstrumentKind {
    #[sea_orm(string_value = "coupon")]
    Coupon,
    #[sea_orm(string_value = "promo")]
    Promo,
}

impl std::fmt::Display for InstrumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstrumentKind::Coupon => write!(f, "coupon"),
            InstrumentKind::Promo => write!(f, "promo"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateInstrumentRequest {
    pub kind: InstrumentKind,
    /// Generated when omitted.
    pub code: Option<String>,
    pub item_type: ItemType,
    pub reference_id: i64,
    pub discount_percent: i32,
    pub expires_at: DateTime<Utc>,
    pub max_usage: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InstrumentResponse {
    pub id: i64,
    pub kind: InstrumentKind,
    pub code: String,
    pub is_active: bool,
    pub item_type: ItemType,
    pub reference_id: i64,
    pub discount_percent: i32,
    pub expires_at: DateTime<Utc>,
    pub max_usage: Option<i64>,
    pub used_count: i64,
}

impl From<discount_instrument_entity::Model> for InstrumentResponse {
    fn from(m: discount_instrument_entity::Model) -> Self {
        let reference_id = m.book_id.or(m.course_id).or(m.event_id).unwrap_or(0);
        Self {
            id: m.id,
            kind: m.kind,
            code: m.code,
            is_active: m.is_active,
            item_type: m.item_type,
            reference_id,
            discount_percent: m.discount_percent,
            expires_at: m.expires_at,
            max_usage: m.max_usage,
            used_count: m.used_count,
        }
    }
}
