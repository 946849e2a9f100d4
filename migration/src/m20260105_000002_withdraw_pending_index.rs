use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Partial unique index: at most one pending withdrawal per user.
        // sea-query's index builder has no WHERE clause, so raw SQL it is.
        let sql = r#"
            CREATE UNIQUE INDEX IF NOT EXISTS uq_withdraw_requests_user_pending
            ON withdraw_requests (user_id)
            WHERE status = 'pending'
        "#;
        manager.get_connection().execute_unprepared(sql).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP INDEX IF EXISTS uq_withdraw_requests_user_pending")
            .await?;
        Ok(())
    }
}
