//! `graphql-service` binary
//!
//! Usage: `graphql-service [config.yaml]`. The config path may also come
//! from `GRAPHQL_SERVICE_CONFIG`; without either, defaults are used.

use anyhow::{Context, Result};
use graphql_service::config::{AppConfig, StorageBackend};
use graphql_service::core::{ConfigError, Store};
use graphql_service::server::ServerBuilder;
use graphql_service::storage::in_memory_store;
use tracing_subscriber::EnvFilter;

const CONFIG_ENV: &str = "GRAPHQL_SERVICE_CONFIG";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = load_config()?;
    let store = open_store(&config).await?;

    if config.storage.should_seed() {
        store
            .seed_member_types()
            .await
            .context("seeding member types")?;
    }

    let addr = config.server.addr();
    tracing::info!(
        %addr,
        backend = ?config.storage.backend,
        max_depth = config.graphql.max_depth,
        "Starting {} v{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );
    if config.graphql.playground {
        tracing::info!("GraphQL playground at http://{}/graphql/playground", addr);
    }

    ServerBuilder::new()
        .with_config(config)
        .with_store(store)
        .serve(&addr)
        .await
}

fn load_config() -> Result<AppConfig> {
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var(CONFIG_ENV).ok());

    match path {
        Some(path) => {
            tracing::info!(%path, "Loading configuration");
            AppConfig::from_yaml_file(&path).with_context(|| format!("loading {}", path))
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Ok(AppConfig::default())
        }
    }
}

async fn open_store(config: &AppConfig) -> Result<Store> {
    match config.storage.backend {
        StorageBackend::InMemory => Ok(in_memory_store()),
        StorageBackend::Postgres => open_postgres(config).await,
    }
}

#[cfg(feature = "postgres")]
async fn open_postgres(config: &AppConfig) -> Result<Store> {
    use graphql_service::storage::{ensure_schema, postgres_store};
    use sqlx::postgres::PgPoolOptions;

    let url = config
        .storage
        .url
        .as_deref()
        .ok_or_else(|| ConfigError::Storage("storage.url is required".to_string()))?;

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(url)
        .await
        .context("connecting to PostgreSQL")?;
    ensure_schema(&pool).await?;

    Ok(postgres_store(pool))
}

#[cfg(not(feature = "postgres"))]
async fn open_postgres(_config: &AppConfig) -> Result<Store> {
    Err(ConfigError::Storage(
        "postgres backend requires building with the `postgres` feature".to_string(),
    )
    .into())
}
