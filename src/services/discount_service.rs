use crate::entities::discount_instrument_entity as instruments;
use crate::error::{AppError, AppResult};
use crate::models::{CreateInstrumentRequest, InstrumentKind, InstrumentResponse, ItemType};
use crate::utils::generate_instrument_code;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    QueryFilter, Set, SqlErr,
};

#[derive(Clone)]
pub struct DiscountService {
    pool: DatabaseConnection,
}

impl DiscountService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// Validate a code against one cart line and burn one use of it.
    ///
    /// A successful call always counts as a use. `conn` is the enclosing
    /// checkout transaction, so a later checkout failure rolls the use back;
    /// the lazy expiry flip deliberately bypasses it (see below).
    ///
    /// Returns the discount percentage to apply to the line's base price.
    pub async fn consume<C: ConnectionTrait>(
        &self,
        conn: &C,
        kind: InstrumentKind,
        code: &str,
        item_type: ItemType,
        reference_id: i64,
    ) -> AppResult<i32> {
        let target_filter = match item_type {
            ItemType::Book => instruments::Column::BookId.eq(reference_id),
            ItemType::Course => instruments::Column::CourseId.eq(reference_id),
            ItemType::Event => instruments::Column::EventId.eq(reference_id),
            // bundles are never a discount target
            ItemType::Bundle => {
                return Err(AppError::NotFound(format!(
                    "No active {kind} matches code {code} for this item"
                )));
            }
        };

        let instrument = instruments::Entity::find()
            .filter(instruments::Column::Kind.eq(kind))
            .filter(instruments::Column::Code.eq(code))
            .filter(instruments::Column::IsActive.eq(true))
            .filter(instruments::Column::ItemType.eq(item_type))
            .filter(target_filter)
            .one(conn)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "No active {kind} matches code {code} for this item"
                ))
            })?;

        if Utc::now() > instrument.expires_at {
            // Deactivate through the pool so the flip survives a rollback of
            // the enclosing checkout transaction.
            self.deactivate(instrument.id).await?;
            return Err(AppError::Expired(format!("{kind} code {code} has expired")));
        }

        if let Some(max_usage) = instrument.max_usage {
            if instrument.used_count >= max_usage {
                return Err(AppError::UsageExceeded(format!(
                    "{kind} code {code} has reached its usage limit"
                )));
            }
        }

        // Single conditional increment: two checkouts racing at the ceiling
        // cannot both get a row.
        let result = instruments::Entity::update_many()
            .col_expr(
                instruments::Column::UsedCount,
                Expr::col(instruments::Column::UsedCount).add(1),
            )
            .filter(instruments::Column::Id.eq(instrument.id))
            .filter(
                Condition::any()
                    .add(instruments::Column::MaxUsage.is_null())
                    .add(
                        Expr::col(instruments::Column::UsedCount)
                            .lt(Expr::col(instruments::Column::MaxUsage)),
                    ),
            )
            .exec(conn)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::UsageExceeded(format!(
                "{kind} code {code} has reached its usage limit"
            )));
        }

        // The increment may have consumed the last use; retire the code in
        // the same transaction.
        if instrument.max_usage.is_some() {
            instruments::Entity::update_many()
                .col_expr(instruments::Column::IsActive, Expr::value(false))
                .filter(instruments::Column::Id.eq(instrument.id))
                .filter(
                    Expr::col(instruments::Column::UsedCount)
                        .gte(Expr::col(instruments::Column::MaxUsage)),
                )
                .exec(conn)
                .await?;
        }

        Ok(instrument.discount_percent)
    }

    pub async fn create_instrument(
        &self,
        request: CreateInstrumentRequest,
    ) -> AppResult<InstrumentResponse> {
        if !(1..=100).contains(&request.discount_percent) {
            return Err(AppError::ValidationError(
                "Discount percentage must be between 1 and 100".to_string(),
            ));
        }
        if request.expires_at <= Utc::now() {
            return Err(AppError::ValidationError(
                "Expiry must be in the future".to_string(),
            ));
        }
        if let Some(max_usage) = request.max_usage {
            if max_usage < 1 {
                return Err(AppError::ValidationError(
                    "Maximum usage must be at least 1".to_string(),
                ));
            }
        }

        let (book_id, course_id, event_id) = match request.item_type {
            ItemType::Book => (Some(request.reference_id), None, None),
            ItemType::Course => (None, Some(request.reference_id), None),
            ItemType::Event => (None, None, Some(request.reference_id)),
            ItemType::Bundle => {
                return Err(AppError::ValidationError(
                    "Discount instruments cannot target bundles".to_string(),
                ));
            }
        };

        let code = match request.code.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => code.to_uppercase(),
            _ => generate_instrument_code(),
        };

        let model = instruments::ActiveModel {
            kind: Set(request.kind),
            code: Set(code),
            is_active: Set(true),
            item_type: Set(request.item_type),
            book_id: Set(book_id),
            course_id: Set(course_id),
            event_id: Set(event_id),
            discount_percent: Set(request.discount_percent),
            expires_at: Set(request.expires_at),
            max_usage: Set(request.max_usage),
            used_count: Set(0),
            ..Default::default()
        }
        .insert(&self.pool)
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => AppError::ValidationError(format!(
                "A {} with this code already exists",
                request.kind
            )),
            _ => AppError::DatabaseError(e),
        })?;

        Ok(model.into())
    }

    /// Reaper entry point: hard-delete anything already inactive or past its
    /// expiry, regardless of remaining usage. Deletes are idempotent.
    pub async fn purge_expired(&self) -> AppResult<u64> {
        let result = instruments::Entity::delete_many()
            .filter(
                Condition::any()
                    .add(instruments::Column::IsActive.eq(false))
                    .add(instruments::Column::ExpiresAt.lt(Utc::now())),
            )
            .exec(&self.pool)
            .await?;
        Ok(result.rows_affected)
    }

    async fn deactivate(&self, instrument_id: i64) -> AppResult<()> {
        instruments::Entity::update_many()
            .col_expr(instruments::Column::IsActive, Expr::value(false))
            .filter(instruments::Column::Id.eq(instrument_id))
            .exec(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn instrument(max_usage: Option<i64>, used_count: i64, expired: bool) -> instruments::Model {
        let expires_at = if expired {
            Utc::now() - Duration::days(1)
        } else {
            Utc::now() + Duration::days(30)
        };
        instruments::Model {
            id: 7,
            kind: InstrumentKind::Coupon,
            code: "SAVE10".to_string(),
            is_active: true,
            item_type: ItemType::Course,
            book_id: None,
            course_id: Some(42),
            event_id: None,
            discount_percent: 10,
            expires_at,
            max_usage,
            used_count,
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

    #[tokio::test]
    async fn test_consume_unknown_code_is_not_found() {
        let pool = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<instruments::Model>::new()])
            .into_connection();
        let service = DiscountService::new(pool.clone());

        let err = service
            .consume(&pool, InstrumentKind::Coupon, "NOPE", ItemType::Course, 42)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_consume_never_matches_a_bundle_line() {
        // no query is ever issued for a bundle line
        let pool = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = DiscountService::new(pool.clone());

        let err = service
            .consume(&pool, InstrumentKind::Promo, "SAVE10", ItemType::Bundle, 9)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_consume_expired_code_deactivates_and_fails() {
        let pool = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![instrument(None, 0, true)]])
            .append_exec_results([exec(1)])
            .into_connection();
        let service = DiscountService::new(pool.clone());

        let err = service
            .consume(&pool, InstrumentKind::Coupon, "SAVE10", ItemType::Course, 42)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Expired(_)));
    }

    #[tokio::test]
    async fn test_consume_at_ceiling_fails_without_mutation() {
        let pool = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![instrument(Some(5), 5, false)]])
            .into_connection();
        let service = DiscountService::new(pool.clone());

        let err = service
            .consume(&pool, InstrumentKind::Coupon, "SAVE10", ItemType::Course, 42)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UsageExceeded(_)));
    }

    #[tokio::test]
    async fn test_consume_losing_the_increment_race_fails() {
        // read saw used_count below the ceiling, but the guarded update
        // matched no rows: a concurrent checkout got there first
        let pool = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![instrument(Some(1), 0, false)]])
            .append_exec_results([exec(0)])
            .into_connection();
        let service = DiscountService::new(pool.clone());

        let err = service
            .consume(&pool, InstrumentKind::Coupon, "SAVE10", ItemType::Course, 42)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UsageExceeded(_)));
    }

    #[tokio::test]
    async fn test_consume_uncapped_code_succeeds() {
        let pool = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![instrument(None, 3, false)]])
            .append_exec_results([exec(1)])
            .into_connection();
        let service = DiscountService::new(pool.clone());

        let percent = service
            .consume(&pool, InstrumentKind::Coupon, "SAVE10", ItemType::Course, 42)
            .await
            .unwrap();
        assert_eq!(percent, 10);
    }

    #[tokio::test]
    async fn test_consume_last_use_retires_the_code() {
        let pool = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![instrument(Some(1), 0, false)]])
            .append_exec_results([exec(1), exec(1)])
            .into_connection();
        let service = DiscountService::new(pool.clone());

        let percent = service
            .consume(&pool, InstrumentKind::Coupon, "SAVE10", ItemType::Course, 42)
            .await
            .unwrap();
        assert_eq!(percent, 10);
    }

    #[tokio::test]
    async fn test_create_instrument_rejects_bundle_targets() {
        let pool = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = DiscountService::new(pool);

        let err = service
            .create_instrument(CreateInstrumentRequest {
                kind: InstrumentKind::Coupon,
                code: Some("BUNDLEDEAL".to_string()),
                item_type: ItemType::Bundle,
                reference_id: 5,
                discount_percent: 10,
                expires_at: Utc::now() + Duration::days(30),
                max_usage: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_purge_expired_reports_deleted_rows() {
        let pool = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec(3)])
            .into_connection();
        let service = DiscountService::new(pool);

        assert_eq!(service.purge_expired().await.unwrap(), 3);
    }
}
