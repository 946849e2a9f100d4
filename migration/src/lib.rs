pub use sea_orm_migration::prelude::*;

mod m20260105_000001_initial;
mod m20260105_000002_withdraw_pending_index;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260105_000001_initial::Migration),
            Box::new(m20260105_000002_withdraw_pending_index::Migration),
        ]
    }
}
