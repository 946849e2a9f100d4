use crate::entities::withdraw_request_entity;
use chrono::{DateTime, Utc};
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "withdraw_channel")]
#[serde(rename_all = "snake_case")]
pub enum WithdrawChannel {
    #[sea_orm(string_value = "paypal")]
    Paypal,
    /// Requires an on-file bank profile.
    #[sea_orm(string_value = "bank_transfer")]
    BankTransfer,
}

impl std::fmt::Display for WithdrawChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WithdrawChannel::Paypal => write!(f, "paypal"),
            WithdrawChannel::BankTransfer => write!(f, "bank_transfer"),
        }
    }
}

#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "withdraw_status")]
#[serde(rename_all = "snake_case")]
pub enum WithdrawStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl std::fmt::Display for WithdrawStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WithdrawStatus::Pending => write!(f, "pending"),
            WithdrawStatus::Completed => write!(f, "completed"),
            WithdrawStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateWithdrawRequest {
    pub user_id: i64,
    pub amount: i64,
    pub channel: WithdrawChannel,
    pub transfer_reference: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WithdrawTransitionRequest {
    pub status: WithdrawStatus,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WithdrawQuery {
    pub user_id: i64,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WithdrawResponse {
    pub id: i64,
    pub user_id: i64,
    pub amount: i64,
    pub channel: WithdrawChannel,
    pub status: WithdrawStatus,
    pub transfer_reference: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<withdraw_request_entity::Model> for WithdrawResponse {
    fn from(m: withdraw_request_entity::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            amount: m.amount,
            channel: m.channel,
            status: m.status,
            transfer_reference: m.transfer_reference,
            created_at: m.created_at.unwrap_or_else(Utc::now),
        }
    }
}
