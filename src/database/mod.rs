use crate::config::DatabaseConfig;
use crate::error::AppResult;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;

pub type DbPool = DatabaseConnection;

pub async fn create_pool(config: &DatabaseConfig) -> AppResult<DbPool> {
    let mut opts = ConnectOptions::new(config.url.clone());
    opts.max_connections(config.max_connections)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    let pool = Database::connect(opts).await?;
    Ok(pool)
}

pub async fn run_migrations(pool: &DbPool) -> AppResult<()> {
    Migrator::up(pool, None).await?;
    Ok(())
}

#[cfg(test)]
pub mod test_support {
    use super::*;

    /// Fresh in-memory SQLite database with the full schema applied.
    pub async fn setup_db() -> DbPool {
        let mut opts = ConnectOptions::new("sqlite::memory:".to_string());
        opts.max_connections(1).min_connections(1).sqlx_logging(false);
        let pool = Database::connect(opts).await.expect("connect sqlite");
        Migrator::up(&pool, None).await.expect("run migrations");
        pool
    }

    pub async fn seed_user(pool: &DbPool, name: &str, email: &str) -> i64 {
        use crate::entities::user_entity;
        use sea_orm::{ActiveModelTrait, Set};

        let now = chrono::Utc::now();
        user_entity::ActiveModel {
            name: Set(name.to_string()),
            email: Set(email.to_string()),
            password_hash: Set(crate::utils::hash_password("Password123").expect("hash")),
            is_admin: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(pool)
        .await
        .expect("insert user")
        .id
    }
}
