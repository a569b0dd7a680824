pub use sea_orm_migration::prelude::*;

mod m20250901_000001_create_users;
mod m20250901_000002_create_catalog;
mod m20250901_000003_create_promo_codes;
mod m20250901_000004_create_account_tables;
mod m20250901_000005_create_feedback;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_000001_create_users::Migration),
            Box::new(m20250901_000002_create_catalog::Migration),
            Box::new(m20250901_000003_create_promo_codes::Migration),
            Box::new(m20250901_000004_create_account_tables::Migration),
            Box::new(m20250901_000005_create_feedback::Migration),
        ]
    }
}
