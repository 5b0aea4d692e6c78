//! In-memory implementations of the storage services for testing and development

use crate::core::entity::{Record, SubscriberOnAuthor};
use crate::core::error::StoreError;
use crate::core::service::{DataService, StoreResult, SubscriptionService};
use crate::core::store::Store;
use async_trait::async_trait;
use indexmap::{IndexMap, IndexSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

/// In-memory record service
///
/// Uses an `IndexMap` behind a `RwLock` so that `list` returns records in
/// insertion order.
pub struct InMemoryDataService<T: Record> {
    records: Arc<RwLock<IndexMap<T::Id, T>>>,
}

impl<T: Record> Clone for InMemoryDataService<T> {
    fn clone(&self) -> Self {
        Self {
            records: self.records.clone(),
        }
    }
}

impl<T: Record> InMemoryDataService<T> {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(IndexMap::new())),
        }
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, IndexMap<T::Id, T>>> {
        self.records
            .read()
            .map_err(|e| StoreError::backend(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, IndexMap<T::Id, T>>> {
        self.records
            .write()
            .map_err(|e| StoreError::backend(format!("Failed to acquire write lock: {}", e)))
    }

    /// Check unique fields of `record` against every other stored record
    fn check_unique(records: &IndexMap<T::Id, T>, record: &T) -> StoreResult<()> {
        for &field in T::unique_fields() {
            let Some(value) = record.field_value(field) else {
                continue;
            };
            let taken = records.values().any(|other| {
                other.id() != record.id() && other.field_value(field).as_deref() == Some(&value)
            });
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

impl<T: Record> Default for InMemoryDataService<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Record> DataService<T> for InMemoryDataService<T> {
    async fn create(&self, record: T) -> StoreResult<T> {
        let mut records = self.write()?;

        if records.contains_key(&record.id()) {
            return Err(StoreError::AlreadyExists {
                resource: T::resource_name(),
                field: "id",
                value: record.id().to_string(),
            });
        }
        Self::check_unique(&records, &record)?;

        records.insert(record.id(), record.clone());
        Ok(record)
    }

    async fn get(&self, id: &T::Id) -> StoreResult<Option<T>> {
        Ok(self.read()?.get(id).cloned())
    }

    async fn list(&self) -> StoreResult<Vec<T>> {
        Ok(self.read()?.values().cloned().collect())
    }

    async fn update(&self, id: &T::Id, record: T) -> StoreResult<T> {
        let mut records = self.write()?;

        if !records.contains_key(id) {
            return Err(StoreError::not_found(T::resource_name(), id));
        }
        Self::check_unique(&records, &record)?;

        records.insert(id.clone(), record.clone());
        Ok(record)
    }

    async fn delete(&self, id: &T::Id) -> StoreResult<bool> {
        Ok(self.write()?.shift_remove(id).is_some())
    }

    async fn find_by(&self, field: &str, value: &str) -> StoreResult<Vec<T>> {
        Ok(self
            .read()?
            .values()
            .filter(|record| record.field_value(field).as_deref() == Some(value))
            .cloned()
            .collect())
    }
}

/// In-memory subscription service
#[derive(Clone, Default)]
pub struct InMemorySubscriptionService {
    rows: Arc<RwLock<IndexSet<SubscriberOnAuthor>>>,
}

impl InMemorySubscriptionService {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, IndexSet<SubscriberOnAuthor>>> {
        self.rows
            .read()
            .map_err(|e| StoreError::backend(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, IndexSet<SubscriberOnAuthor>>> {
        self.rows
            .write()
            .map_err(|e| StoreError::backend(format!("Failed to acquire write lock: {}", e)))
    }
}

#[async_trait]
impl SubscriptionService for InMemorySubscriptionService {
    async fn subscribe(&self, subscriber_id: &Uuid, author_id: &Uuid) -> StoreResult<()> {
        self.write()?.insert(SubscriberOnAuthor {
            subscriber_id: *subscriber_id,
            author_id: *author_id,
        });
        Ok(())
    }

    async fn unsubscribe(&self, subscriber_id: &Uuid, author_id: &Uuid) -> StoreResult<bool> {
        Ok(self.write()?.shift_remove(&SubscriberOnAuthor {
            subscriber_id: *subscriber_id,
            author_id: *author_id,
        }))
    }

    async fn subscribers_of(&self, author_id: &Uuid) -> StoreResult<Vec<Uuid>> {
        Ok(self
            .read()?
            .iter()
            .filter(|row| &row.author_id == author_id)
            .map(|row| row.subscriber_id)
            .collect())
    }

    async fn subscriptions_of(&self, subscriber_id: &Uuid) -> StoreResult<Vec<Uuid>> {
        Ok(self
            .read()?
            .iter()
            .filter(|row| &row.subscriber_id == subscriber_id)
            .map(|row| row.author_id)
            .collect())
    }

    async fn delete_by_user(&self, user_id: &Uuid) -> StoreResult<()> {
        self.write()?
            .retain(|row| &row.subscriber_id != user_id && &row.author_id != user_id);
        Ok(())
    }
}

/// Build a [`Store`] backed entirely by in-memory services
pub fn in_memory_store() -> Store {
    Store::new(
        Arc::new(InMemoryDataService::new()),
        Arc::new(InMemoryDataService::new()),
        Arc::new(InMemoryDataService::new()),
        Arc::new(InMemoryDataService::new()),
        Arc::new(InMemorySubscriptionService::new()),
    )
}
