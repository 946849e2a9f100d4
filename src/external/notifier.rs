use crate::config::NotifierConfig;
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::json;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    OrderPlaced,
    WithdrawalCompleted,
    WithdrawalCancelled,
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationKind::OrderPlaced => write!(f, "order_placed"),
            NotificationKind::WithdrawalCompleted => write!(f, "withdrawal_completed"),
            NotificationKind::WithdrawalCancelled => write!(f, "withdrawal_cancelled"),
        }
    }
}

/// Delivery is another service's problem; from here notifications are
/// fire-and-forget and callers log failures instead of propagating them.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(
        &self,
        user_id: i64,
        kind: NotificationKind,
        context: serde_json::Value,
    ) -> AppResult<()>;
}

#[derive(Clone)]
pub struct HttpNotifier {
    client: Client,
    config: NotifierConfig,
}

impl HttpNotifier {
    pub fn new(config: NotifierConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn notify(
        &self,
        user_id: i64,
        kind: NotificationKind,
        context: serde_json::Value,
    ) -> AppResult<()> {
        let url = format!("{}/internal/notifications", self.config.base_url);

        let response = self
            .client
            .post(&url)
            .json(&json!({
                "userId": user_id,
                "kind": kind,
                "context": context,
            }))
            .send()
            .await?;

        if response.status().is_success() {
            log::debug!("Notification {kind} dispatched to user {user_id}");
            Ok(())
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(AppError::ExternalApiError(format!(
                "Notification dispatch failed: {error_text}"
            )))
        }
    }
}
