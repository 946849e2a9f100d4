use crate::entities::{user_entity as users, withdraw_request_entity as requests};
use crate::error::{AppError, AppResult};
use crate::external::{NotificationKind, Notifier};
use crate::models::{
    CreateWithdrawRequest, PaginatedResponse, PaginationParams, WithdrawChannel, WithdrawQuery,
    WithdrawResponse, WithdrawStatus,
};
use crate::services::UserService;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
};
use serde_json::json;
use std::sync::Arc;

/// Only pending requests move, and only to a terminal state. Everything
/// else, including re-asserting the current status, is rejected.
fn ensure_transition(current: &WithdrawStatus, target: &WithdrawStatus) -> AppResult<()> {
    match (current, target) {
        (WithdrawStatus::Pending, WithdrawStatus::Completed)
        | (WithdrawStatus::Pending, WithdrawStatus::Cancelled) => Ok(()),
        _ => Err(AppError::InvalidTransition(format!(
            "Cannot move a withdrawal from {current} to {target}"
        ))),
    }
}

#[derive(Clone)]
pub struct WithdrawalService {
    pool: DatabaseConnection,
    user_service: UserService,
    notifier: Arc<dyn Notifier>,
}

impl WithdrawalService {
    pub fn new(
        pool: DatabaseConnection,
        user_service: UserService,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            pool,
            user_service,
            notifier,
        }
    }

    /// Open a payout request against the user's balance. The balance is not
    /// touched here; it is debited on completion.
    pub async fn create(&self, request: CreateWithdrawRequest) -> AppResult<WithdrawResponse> {
        let user = self
            .user_service
            .get_live_user(&self.pool, request.user_id)
            .await?;

        if request.amount <= 0 {
            return Err(AppError::ValidationError(
                "Withdrawal amount must be positive".to_string(),
            ));
        }

        let pending = requests::Entity::find()
            .filter(requests::Column::UserId.eq(request.user_id))
            .filter(requests::Column::Status.eq(WithdrawStatus::Pending))
            .one(&self.pool)
            .await?;
        if pending.is_some() {
            return Err(AppError::ValidationError(
                "A withdrawal request is already pending for this user".to_string(),
            ));
        }

        if request.amount > user.balance {
            return Err(AppError::ValidationError(
                "Requested amount exceeds the current balance".to_string(),
            ));
        }

        if request.channel == WithdrawChannel::BankTransfer
            && !self.user_service.has_bank_profile(request.user_id).await?
        {
            return Err(AppError::ValidationError(
                "Bank transfer withdrawals require a bank profile on file".to_string(),
            ));
        }

        let model = requests::ActiveModel {
            user_id: Set(request.user_id),
            amount: Set(request.amount),
            channel: Set(request.channel.clone()),
            status: Set(WithdrawStatus::Pending),
            transfer_reference: Set(request.transfer_reference.clone()),
            ..Default::default()
        }
        .insert(&self.pool)
        .await
        .map_err(|e| match e.sql_err() {
            // the partial unique index catches creates racing past the check above
            Some(SqlErr::UniqueConstraintViolation(_)) => AppError::ValidationError(
                "A withdrawal request is already pending for this user".to_string(),
            ),
            _ => AppError::DatabaseError(e),
        })?;

        Ok(model.into())
    }

    /// Administrative `pending -> completed | cancelled` transition.
    /// Completion re-checks and debits the balance in the same transaction;
    /// an insufficient balance fails without mutating anything.
    pub async fn transition(
        &self,
        request_id: i64,
        target: WithdrawStatus,
    ) -> AppResult<WithdrawResponse> {
        let txn = self.pool.begin().await?;

        let request = requests::Entity::find_by_id(request_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("No withdrawal request found with id {request_id}"))
            })?;

        ensure_transition(&request.status, &target)?;

        let user_id = request.user_id;
        let amount = request.amount;

        let mut active = request.into_active_model();
        active.status = Set(target.clone());
        active.updated_at = Set(Some(Utc::now()));
        let updated = active.update(&txn).await?;

        if target == WithdrawStatus::Completed {
            // The balance may have moved since the request was created;
            // debit only while it still covers the amount.
            let result = users::Entity::update_many()
                .col_expr(
                    users::Column::Balance,
                    Expr::col(users::Column::Balance).sub(amount),
                )
                .filter(users::Column::Id.eq(user_id))
                .filter(users::Column::Balance.gte(amount))
                .exec(&txn)
                .await?;

            if result.rows_affected == 0 {
                // dropping the transaction rolls the status flip back
                return Err(AppError::ValidationError(
                    "Insufficient balance to complete this withdrawal".to_string(),
                ));
            }
        }

        txn.commit().await?;

        let kind = match target {
            WithdrawStatus::Completed => NotificationKind::WithdrawalCompleted,
            _ => NotificationKind::WithdrawalCancelled,
        };
        if let Err(e) = self
            .notifier
            .notify(
                user_id,
                kind,
                json!({ "request_id": request_id, "amount": amount }),
            )
            .await
        {
            log::warn!("Failed to notify user {user_id} about withdrawal {request_id}: {e:?}");
        }

        Ok(updated.into())
    }

    pub async fn list_user_requests(
        &self,
        query: &WithdrawQuery,
    ) -> AppResult<PaginatedResponse<WithdrawResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);

        let base = requests::Entity::find().filter(requests::Column::UserId.eq(query.user_id));

        let total = base.clone().count(&self.pool).await? as i64;

        let models = base
            .order_by_desc(requests::Column::CreatedAt)
            .limit(params.get_limit() as u64)
            .offset(params.get_offset() as u64)
            .all(&self.pool)
            .await?;

        let items: Vec<WithdrawResponse> = models.into_iter().map(Into::into).collect();

        Ok(PaginatedResponse::new(
            items,
            params.get_page(),
            params.get_limit(),
            total,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    struct NullNotifier;

    #[async_trait]
    impl Notifier for NullNotifier {
        async fn notify(
            &self,
            _user_id: i64,
            _kind: NotificationKind,
            _context: serde_json::Value,
        ) -> AppResult<()> {
            Ok(())
        }
    }

    fn service(pool: DatabaseConnection) -> WithdrawalService {
        WithdrawalService::new(pool.clone(), UserService::new(pool), Arc::new(NullNotifier))
    }

    fn user(balance: i64) -> users::Model {
        users::Model {
            id: 1,
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            balance,
            is_active: true,
            is_deleted: false,
            created_at: None,
            updated_at: None,
        }
    }

    fn request(status: WithdrawStatus, amount: i64) -> requests::Model {
        requests::Model {
            id: 5,
            user_id: 1,
            amount,
            channel: WithdrawChannel::Paypal,
            status,
            transfer_reference: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn exec(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    #[test]
    fn test_transition_legality_matrix() {
        use WithdrawStatus::*;
        assert!(ensure_transition(&Pending, &Completed).is_ok());
        assert!(ensure_transition(&Pending, &Cancelled).is_ok());
        // no-op re-assertions are rejected too
        assert!(ensure_transition(&Pending, &Pending).is_err());
        assert!(ensure_transition(&Completed, &Completed).is_err());
        // terminal states never move again
        assert!(ensure_transition(&Completed, &Cancelled).is_err());
        assert!(ensure_transition(&Cancelled, &Completed).is_err());
        assert!(ensure_transition(&Cancelled, &Pending).is_err());
    }

    #[tokio::test]
    async fn test_create_rejects_amount_over_balance() {
        let pool = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user(3000)]])
            .append_query_results([Vec::<requests::Model>::new()])
            .into_connection();

        let err = service(pool)
            .create(CreateWithdrawRequest {
                user_id: 1,
                amount: 5000,
                channel: WithdrawChannel::Paypal,
                transfer_reference: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_create_rejects_second_pending_request() {
        let pool = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user(3000)]])
            .append_query_results([vec![request(WithdrawStatus::Pending, 1000)]])
            .into_connection();

        let err = service(pool)
            .create(CreateWithdrawRequest {
                user_id: 1,
                amount: 1000,
                channel: WithdrawChannel::Paypal,
                transfer_reference: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_create_within_balance_opens_pending_request() {
        let pool = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user(3000)]])
            .append_query_results([Vec::<requests::Model>::new()])
            .append_query_results([vec![request(WithdrawStatus::Pending, 3000)]])
            .into_connection();

        let created = service(pool)
            .create(CreateWithdrawRequest {
                user_id: 1,
                amount: 3000,
                channel: WithdrawChannel::Paypal,
                transfer_reference: None,
            })
            .await
            .unwrap();
        assert_eq!(created.status, WithdrawStatus::Pending);
        assert_eq!(created.amount, 3000);
    }

    #[tokio::test]
    async fn test_completion_debits_balance_once() {
        let pool = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![request(WithdrawStatus::Pending, 3000)]])
            .append_query_results([vec![request(WithdrawStatus::Completed, 3000)]])
            .append_exec_results([exec(1)])
            .into_connection();

        let updated = service(pool)
            .transition(5, WithdrawStatus::Completed)
            .await
            .unwrap();
        assert_eq!(updated.status, WithdrawStatus::Completed);
    }

    #[tokio::test]
    async fn test_completion_with_insufficient_balance_mutates_nothing() {
        // the guarded debit matches no row, so the whole transaction is
        // rolled back, status flip included
        let pool = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![request(WithdrawStatus::Pending, 3000)]])
            .append_query_results([vec![request(WithdrawStatus::Completed, 3000)]])
            .append_exec_results([exec(0)])
            .into_connection();

        let err = service(pool)
            .transition(5, WithdrawStatus::Completed)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_cancellation_never_touches_the_balance() {
        let pool = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![request(WithdrawStatus::Pending, 3000)]])
            .append_query_results([vec![request(WithdrawStatus::Cancelled, 3000)]])
            .into_connection();

        let updated = service(pool)
            .transition(5, WithdrawStatus::Cancelled)
            .await
            .unwrap();
        assert_eq!(updated.status, WithdrawStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_transition_on_terminal_request_is_rejected() {
        let pool = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![request(WithdrawStatus::Completed, 3000)]])
            .into_connection();

        let err = service(pool)
            .transition(5, WithdrawStatus::Cancelled)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition(_)));
    }

    #[tokio::test]
    async fn test_transition_on_missing_request_is_not_found() {
        let pool = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<requests::Model>::new()])
            .into_connection();

        let err = service(pool)
            .transition(5, WithdrawStatus::Completed)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
