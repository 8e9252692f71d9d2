//! Shared application state

use crate::{
    config::{Config, StorageBackend},
    db::{CompanyRepository, InMemoryCompanyStore, PostgresCompanyStore},
    services::{CompanyService, EligibilityRule},
    Result,
};
use company_registry_client::{CompanyRegistry, RegistryClient};
use sqlx::PgPool;
use std::sync::Arc;

/// Shared application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Present only for the Postgres backend.
    pub db_pool: Option<PgPool>,
    pub company_service: Arc<CompanyService>,
}

impl AppState {
    /// Initialize the application state
    pub async fn new(config: Config) -> Result<Self> {
        tracing::info!("Initializing application state...");

        let (db_pool, repository): (Option<PgPool>, Arc<dyn CompanyRepository>) =
            match config.database.backend {
                StorageBackend::Postgres => {
                    let pool = create_db_pool(&config).await?;

                    if config.database.run_migrations {
                        tracing::info!("Running database migrations...");
                        sqlx::migrate!("./migrations")
                            .run(&pool)
                            .await
                            .map_err(|e| crate::Error::Internal(format!("Migration failed: {}", e)))?;
                    }

                    let store: Arc<dyn CompanyRepository> =
                        Arc::new(PostgresCompanyStore::new(pool.clone()));
                    (Some(pool), store)
                }
                StorageBackend::Memory => {
                    tracing::warn!("Using in-memory storage; records are lost on restart");
                    let store: Arc<dyn CompanyRepository> = Arc::new(InMemoryCompanyStore::new());
                    (None, store)
                }
            };

        let registry = RegistryClient::new(config.registry.client_config()).map_err(|e| {
            crate::Error::Internal(format!("Failed to initialize registry client: {e}"))
        })?;
        tracing::info!(
            base_url = %config.registry.base_url,
            timeout_seconds = config.registry.timeout_seconds,
            allowed_cnae = %config.registry.allowed_cnae,
            "Registry client ready"
        );

        let mut state = Self::with_components(config, repository, Arc::new(registry));
        state.db_pool = db_pool;

        tracing::info!("Application state initialized successfully");
        Ok(state)
    }

    /// Assemble state from already-built storage and registry components.
    pub fn with_components(
        config: Config,
        repository: Arc<dyn CompanyRepository>,
        registry: Arc<dyn CompanyRegistry>,
    ) -> Self {
        let company_service = Arc::new(CompanyService::new(
            repository,
            registry,
            EligibilityRule::new(&config.registry.allowed_cnae),
            config.pagination.clone(),
        ));

        Self {
            config: Arc::new(config),
            db_pool: None,
            company_service,
        }
    }
}

async fn create_db_pool(config: &Config) -> Result<PgPool> {
    tracing::info!("Creating database connection pool...");

    let statement_timeout = config.database.statement_timeout_seconds;
    let lock_timeout = config.database.lock_timeout_seconds;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .min_connections(config.database.pool_min_size)
        .max_connections(config.database.pool_max_size)
        .acquire_timeout(std::time::Duration::from_secs(
            config.database.pool_timeout_seconds,
        ))
        .after_connect(move |conn, _meta| {
            Box::pin(async move {
                // Set statement timeout (max query execution time)
                sqlx::query(&format!("SET statement_timeout = '{}s'", statement_timeout))
                    .execute(&mut *conn)
                    .await?;

                // Fail fast on contended rows
                sqlx::query(&format!("SET lock_timeout = '{}s'", lock_timeout))
                    .execute(&mut *conn)
                    .await?;

                Ok(())
            })
        })
        .connect(&config.database.url)
        .await
        .map_err(crate::Error::Database)?;

    tracing::info!(
        "Database pool created (min: {}, max: {})",
        config.database.pool_min_size,
        config.database.pool_max_size
    );

    Ok(pool)
}
