//! PostgreSQL adapters - Database implementations for the store ports.
//!
//! - `PostgresCourseRepository` - Catalog persistence
//! - `PostgresAvailabilityRegistry` - School assignments and subscriptions
//! - `PostgresEnrollmentLedger` - Conditional enrollment writes
//! - `PostgresActivationCodeVault` - Transactional code redemption

mod activation_code_vault;
mod availability_registry;
mod course_repository;
mod enrollment_ledger;
mod rows;

pub use activation_code_vault::PostgresActivationCodeVault;
pub use availability_registry::PostgresAvailabilityRegistry;
pub use course_repository::PostgresCourseRepository;
pub use enrollment_ledger::PostgresEnrollmentLedger;

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::DatabaseConfig;

/// Opens a connection pool sized from `config`.
pub async fn connect(url: &str, config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .idle_timeout(config.idle_timeout())
        .max_lifetime(config.max_lifetime())
        .connect(url)
        .await?;

    tracing::info!(
        max_connections = config.max_connections,
        "Connected to PostgreSQL"
    );
    Ok(pool)
}

/// Applies the embedded migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Database migrations applied");
    Ok(())
}
