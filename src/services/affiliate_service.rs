use crate::entities::affiliate_entity as affiliates;
use crate::error::{AppError, AppResult};
use sea_orm::{DatabaseConnection, EntityTrait};

#[derive(Clone)]
pub struct AffiliateService {
    pool: DatabaseConnection,
}

impl AffiliateService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// Affiliates only need to exist to be credited; there is no activity
    /// check beyond that.
    pub async fn validate(&self, affiliate_id: i64) -> AppResult<affiliates::Model> {
        affiliates::Entity::find_by_id(affiliate_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("No affiliate found with id {affiliate_id}"))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_existing_affiliate_is_returned() {
        let model = affiliates::Model {
            id: 11,
            user_id: 99,
            created_at: None,
        };
        let pool = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model]])
            .into_connection();
        let service = AffiliateService::new(pool);

        let affiliate = service.validate(11).await.unwrap();
        assert_eq!(affiliate.user_id, 99);
    }

    #[tokio::test]
    async fn test_missing_affiliate_is_not_found() {
        let pool = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<affiliates::Model>::new()])
            .into_connection();
        let service = AffiliateService::new(pool);

        let err = service.validate(11).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
