use crate::models::ItemType;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CartLine {
    pub item_type: ItemType,
    pub reference_id: i64,
    /// Defaults to 1 when omitted.
    pub quantity: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentMeta {
    pub method: String,
    /// External gateway transaction id; recorded, never reconciled here.
    pub transaction_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    pub user_id: i64,
    pub items: Vec<CartLine>,
    pub coupon_code: Option<String>,
    pub promo_code: Option<String>,
    pub affiliate_id: Option<i64>,
    pub payment: Option<PaymentMeta>,
}
