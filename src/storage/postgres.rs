//! PostgreSQL storage backend using sqlx.
//!
//! Provides `PostgresDataService<T>` and `PostgresSubscriptionService`
//! backed by a PostgreSQL database via `sqlx::PgPool`.
//!
//! # Feature flag
//!
//! This module is gated behind the `postgres` feature flag:
//! ```toml
//! [dependencies]
//! graphql-service = { version = "0.1", features = ["postgres"] }
//! ```
//!
//! # Schema
//!
//! Records of every type share a `records` table keyed by
//! `(resource, id)`, with the serialized record in a JSONB `data` column.
//! The subscriber/author relation lives in `subscribers_on_authors`.
//! A `seq` column keeps listing in insertion order.

use crate::core::entity::Record;
use crate::core::error::StoreError;
use crate::core::service::{DataService, StoreResult, SubscriptionService};
use crate::core::store::Store;
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Schema management
// ---------------------------------------------------------------------------

/// Apply the required tables and indexes (idempotent).
///
/// Safe to call on every startup.
pub async fn ensure_schema(pool: &PgPool) -> StoreResult<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS records (
            resource TEXT NOT NULL,
            id TEXT NOT NULL,
            seq BIGSERIAL,
            data JSONB NOT NULL,
            PRIMARY KEY (resource, id)
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE UNIQUE INDEX IF NOT EXISTS records_profile_user_id
            ON records ((data->>'userId')) WHERE resource = 'profile'",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS records_post_author_id
            ON records ((data->>'authorId')) WHERE resource = 'post'",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS subscribers_on_authors (
            subscriber_id UUID NOT NULL,
            author_id UUID NOT NULL,
            seq BIGSERIAL,
            PRIMARY KEY (subscriber_id, author_id)
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS subscribers_on_authors_author
            ON subscribers_on_authors (author_id)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Build a [`Store`] whose services all share `pool`
pub fn postgres_store(pool: PgPool) -> Store {
    Store::new(
        Arc::new(PostgresDataService::new(pool.clone())),
        Arc::new(PostgresDataService::new(pool.clone())),
        Arc::new(PostgresDataService::new(pool.clone())),
        Arc::new(PostgresDataService::new(pool.clone())),
        Arc::new(PostgresSubscriptionService::new(pool)),
    )
}

// ---------------------------------------------------------------------------
// PostgresDataService<T>
// ---------------------------------------------------------------------------

/// Generic record storage service backed by PostgreSQL.
#[derive(Clone, Debug)]
pub struct PostgresDataService<T> {
    pool: PgPool,
    _marker: std::marker::PhantomData<T>,
}

impl<T> PostgresDataService<T> {
    /// Create a new `PostgresDataService` with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _marker: std::marker::PhantomData,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl<T: Record> PostgresDataService<T> {
    fn decode(data: serde_json::Value) -> StoreResult<T> {
        serde_json::from_value(data).map_err(|e| {
            StoreError::backend(format!(
                "Failed to decode {} from row: {}",
                T::resource_name(),
                e
            ))
        })
    }

    /// Map a unique-index violation raised by a concurrent writer to `AlreadyExists`
    fn conflict(err: sqlx::Error, record: &T) -> StoreError {
        let unique_violation = match &err {
            sqlx::Error::Database(db) => db.is_unique_violation(),
            _ => false,
        };
        if !unique_violation {
            return err.into();
        }

        let (field, value) = T::unique_fields()
            .iter()
            .find_map(|&field| record.field_value(field).map(|value| (field, value)))
            .unwrap_or(("id", record.id().to_string()));
        StoreError::AlreadyExists {
            resource: T::resource_name(),
            field,
            value,
        }
    }

    async fn check_unique(&self, record: &T) -> StoreResult<()> {
        let id = record.id().to_string();
        for &field in T::unique_fields() {
            let Some(value) = record.field_value(field) else {
                continue;
            };
            let taken: bool = sqlx::query_scalar(
                "SELECT EXISTS (
                    SELECT 1 FROM records
                    WHERE resource = $1 AND data->>$2 = $3 AND id <> $4
                )",
            )
            .bind(T::resource_name())
            .bind(field)
            .bind(&value)
            .bind(&id)
            .fetch_one(&self.pool)
            .await?;

            if taken {
                return Err(StoreError::AlreadyExists {
                    resource: T::resource_name(),
                    field,
                    value,
                });
            }
        }
        Ok(())
    }
}

#[async_trait]
impl<T: Record> DataService<T> for PostgresDataService<T> {
    async fn create(&self, record: T) -> StoreResult<T> {
        self.check_unique(&record).await?;
        let data = serde_json::to_value(&record)?;

        let result = sqlx::query(
            "INSERT INTO records (resource, id, data) VALUES ($1, $2, $3)
             ON CONFLICT (resource, id) DO NOTHING",
        )
        .bind(T::resource_name())
        .bind(record.id().to_string())
        .bind(&data)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::conflict(e, &record))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::AlreadyExists {
                resource: T::resource_name(),
                field: "id",
                value: record.id().to_string(),
            });
        }
        Ok(record)
    }

    async fn get(&self, id: &T::Id) -> StoreResult<Option<T>> {
        let row: Option<serde_json::Value> =
            sqlx::query_scalar("SELECT data FROM records WHERE resource = $1 AND id = $2")
                .bind(T::resource_name())
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await?;

        row.map(Self::decode).transpose()
    }

    async fn list(&self) -> StoreResult<Vec<T>> {
        let rows: Vec<serde_json::Value> =
            sqlx::query_scalar("SELECT data FROM records WHERE resource = $1 ORDER BY seq")
                .bind(T::resource_name())
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(Self::decode).collect()
    }

    async fn update(&self, id: &T::Id, record: T) -> StoreResult<T> {
        self.check_unique(&record).await?;
        let data = serde_json::to_value(&record)?;

        let result = sqlx::query("UPDATE records SET data = $3 WHERE resource = $1 AND id = $2")
            .bind(T::resource_name())
            .bind(id.to_string())
            .bind(&data)
            .execute(&self.pool)
            .await
            .map_err(|e| Self::conflict(e, &record))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(T::resource_name(), id));
        }
        Ok(record)
    }

    async fn delete(&self, id: &T::Id) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM records WHERE resource = $1 AND id = $2")
            .bind(T::resource_name())
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_by(&self, field: &str, value: &str) -> StoreResult<Vec<T>> {
        let rows: Vec<serde_json::Value> = sqlx::query_scalar(
            "SELECT data FROM records WHERE resource = $1 AND data->>$2 = $3 ORDER BY seq",
        )
        .bind(T::resource_name())
        .bind(field)
        .bind(value)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::decode).collect()
    }
}

// ---------------------------------------------------------------------------
// PostgresSubscriptionService
// ---------------------------------------------------------------------------

/// Subscription storage backed by the `subscribers_on_authors` table.
#[derive(Clone, Debug)]
pub struct PostgresSubscriptionService {
    pool: PgPool,
}

impl PostgresSubscriptionService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriptionService for PostgresSubscriptionService {
    async fn subscribe(&self, subscriber_id: &Uuid, author_id: &Uuid) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO subscribers_on_authors (subscriber_id, author_id) VALUES ($1, $2)
             ON CONFLICT DO NOTHING",
        )
        .bind(subscriber_id)
        .bind(author_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn unsubscribe(&self, subscriber_id: &Uuid, author_id: &Uuid) -> StoreResult<bool> {
        let result = sqlx::query(
            "DELETE FROM subscribers_on_authors WHERE subscriber_id = $1 AND author_id = $2",
        )
        .bind(subscriber_id)
        .bind(author_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn subscribers_of(&self, author_id: &Uuid) -> StoreResult<Vec<Uuid>> {
        let ids: Vec<Uuid> = sqlx::query_scalar(
            "SELECT subscriber_id FROM subscribers_on_authors WHERE author_id = $1 ORDER BY seq",
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }

    async fn subscriptions_of(&self, subscriber_id: &Uuid) -> StoreResult<Vec<Uuid>> {
        let ids: Vec<Uuid> = sqlx::query_scalar(
            "SELECT author_id FROM subscribers_on_authors WHERE subscriber_id = $1 ORDER BY seq",
        )
        .bind(subscriber_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }

    async fn delete_by_user(&self, user_id: &Uuid) -> StoreResult<()> {
        sqlx::query(
            "DELETE FROM subscribers_on_authors WHERE subscriber_id = $1 OR author_id = $1",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
