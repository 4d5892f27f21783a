//! course-entitlements - Binary Entry Point
//!
//! Loads configuration, wires the store and directory adapters, and serves
//! the entitlement API.

use std::sync::Arc;

use course_entitlements::adapters::http::{api_router, EntitlementAppState};
use course_entitlements::adapters::postgres::{
    self, PostgresActivationCodeVault, PostgresAvailabilityRegistry, PostgresCourseRepository,
    PostgresEnrollmentLedger,
};
use course_entitlements::adapters::{
    HttpDirectory, HttpDirectoryConfig, InMemoryDirectory, InMemoryEntitlementStore,
    InMemoryEventBus,
};
use course_entitlements::application::UserContextResolver;
use course_entitlements::config::{AppConfig, DatabaseConfig, DirectoryConfig};
use course_entitlements::ports::{
    ActivationCodeVault, AvailabilityRegistry, ClassRoster, CourseRepository, DirectoryGateway,
    EnrollmentLedger, SchoolRegistry,
};

struct Stores {
    courses: Arc<dyn CourseRepository>,
    availability: Arc<dyn AvailabilityRegistry>,
    ledger: Arc<dyn EnrollmentLedger>,
    vault: Arc<dyn ActivationCodeVault>,
}

struct Directory {
    gateway: Arc<dyn DirectoryGateway>,
    roster: Arc<dyn ClassRoster>,
    schools: Arc<dyn SchoolRegistry>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;

    init_tracing(&config);

    config.validate().map_err(|e| {
        tracing::error!("Invalid configuration: {e}");
        e
    })?;

    let stores = open_stores(&config.database).await?;
    let directory = open_directory(&config.directory)?;

    let resolver = Arc::new(UserContextResolver::new(
        directory.gateway,
        directory.roster,
    ));

    let state = EntitlementAppState {
        courses: stores.courses,
        availability: stores.availability,
        ledger: stores.ledger,
        vault: stores.vault,
        schools: directory.schools,
        event_publisher: Arc::new(InMemoryEventBus::new()),
        resolver,
    };

    let app = api_router(state, &config.server);

    let addr = config.server.socket_addr()?;
    tracing::info!(
        environment = ?config.server.environment,
        "course-entitlements listening on {}",
        addr
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.server.log_level));

    if config.json_logs() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// PostgreSQL when a URL is configured, otherwise the in-memory store.
async fn open_stores(config: &DatabaseConfig) -> Result<Stores, Box<dyn std::error::Error>> {
    let Some(url) = config.url() else {
        tracing::warn!("No database URL configured; using the in-memory store");
        let store = Arc::new(InMemoryEntitlementStore::new());
        return Ok(Stores {
            courses: store.clone(),
            availability: store.clone(),
            ledger: store.clone(),
            vault: store,
        });
    };

    let pool = postgres::connect(url, config).await.map_err(|e| {
        tracing::error!("Database connection failed: {e}");
        e
    })?;

    if config.run_migrations {
        postgres::run_migrations(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    Ok(Stores {
        courses: Arc::new(PostgresCourseRepository::new(pool.clone())),
        availability: Arc::new(PostgresAvailabilityRegistry::new(pool.clone())),
        ledger: Arc::new(PostgresEnrollmentLedger::new(pool.clone())),
        vault: Arc::new(PostgresActivationCodeVault::new(pool)),
    })
}

/// The directory service when a base URL is configured, otherwise a seeded
/// in-memory directory.
fn open_directory(config: &DirectoryConfig) -> Result<Directory, Box<dyn std::error::Error>> {
    if let Some(base_url) = config.base_url() {
        let client = Arc::new(HttpDirectory::new(
            HttpDirectoryConfig::new(base_url).with_timeout(config.timeout()),
        )?);
        tracing::info!(base_url = %base_url, "Using directory service");
        return Ok(Directory {
            gateway: client.clone(),
            roster: client.clone(),
            schools: client,
        });
    }

    let directory = match &config.seed_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "Seeding in-memory directory");
            InMemoryDirectory::from_seed_file(path)?
        }
        None => {
            tracing::warn!("No directory configured; every identity will be rejected");
            InMemoryDirectory::new()
        }
    };

    let directory = Arc::new(directory);
    Ok(Directory {
        gateway: directory.clone(),
        roster: directory.clone(),
        schools: directory,
    })
}
