use crate::entities::{bank_profile_entity as bank_profiles, user_entity as users};
use crate::error::{AppError, AppResult};
use sea_orm::{ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter};

/// Read-side of the user store: the engine never creates or edits profiles,
/// it only needs to know who may transact and what their balance is.
#[derive(Clone)]
pub struct UserService {
    pool: DatabaseConnection,
}

impl UserService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// A user that may transact: exists, not soft-deleted, active.
    /// Missing and soft-deleted look the same from the outside.
    pub async fn get_live_user<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: i64,
    ) -> AppResult<users::Model> {
        let user = users::Entity::find_by_id(user_id)
            .one(conn)
            .await?
            .filter(|u| !u.is_deleted)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if !user.is_active {
            return Err(AppError::ValidationError(
                "User account is inactive".to_string(),
            ));
        }

        Ok(user)
    }

    pub async fn has_bank_profile(&self, user_id: i64) -> AppResult<bool> {
        let profile = bank_profiles::Entity::find()
            .filter(bank_profiles::Column::UserId.eq(user_id))
            .one(&self.pool)
            .await?;
        Ok(profile.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn user(is_active: bool, is_deleted: bool) -> users::Model {
        users::Model {
            id: 1,
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            balance: 5000,
            is_active,
            is_deleted,
            created_at: None,
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_missing_user_is_not_found() {
        let pool = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<users::Model>::new()])
            .into_connection();
        let service = UserService::new(pool.clone());

        let err = service.get_live_user(&pool, 1).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_soft_deleted_user_is_not_found() {
        let pool = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user(true, true)]])
            .into_connection();
        let service = UserService::new(pool.clone());

        let err = service.get_live_user(&pool, 1).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_inactive_user_is_invalid() {
        let pool = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user(false, false)]])
            .into_connection();
        let service = UserService::new(pool.clone());

        let err = service.get_live_user(&pool, 1).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_live_user_is_returned() {
        let pool = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user(true, false)]])
            .into_connection();
        let service = UserService::new(pool.clone());

        let found = service.get_live_user(&pool, 1).await.unwrap();
        assert_eq!(found.balance, 5000);
    }

    #[tokio::test]
    async fn test_bank_profile_presence() {
        let profile = bank_profiles::Model {
            id: 1,
            user_id: 1,
            bank_name: "First Bank".to_string(),
            account_name: "Ada L".to_string(),
            account_number: "0001112223".to_string(),
            created_at: None,
        };
        let pool = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![profile]])
            .append_query_results([Vec::<bank_profiles::Model>::new()])
            .into_connection();
        let service = UserService::new(pool);

        assert!(service.has_bank_profile(1).await.unwrap());
        assert!(!service.has_bank_profile(2).await.unwrap());
    }
}
