//! Service traits for record and subscription storage

use crate::core::entity::Record;
use crate::core::error::StoreError;
use async_trait::async_trait;
use uuid::Uuid;

pub type StoreResult<T> = Result<T, StoreError>;

/// Service trait for storing one record type
///
/// Implementations provide CRUD operations for a specific record type.
/// Relational rules (foreign keys, cascades) are not enforced here; see
/// [`Store`](crate::core::Store).
#[async_trait]
pub trait DataService<T: Record>: Send + Sync {
    /// Insert a new record
    ///
    /// Fails with `AlreadyExists` when the id or a unique field collides.
    async fn create(&self, record: T) -> StoreResult<T>;

    /// Get a record by id
    async fn get(&self, id: &T::Id) -> StoreResult<Option<T>>;

    /// List all records in insertion order
    async fn list(&self) -> StoreResult<Vec<T>>;

    /// Replace an existing record
    ///
    /// Fails with `NotFound` when nothing is stored under `id`.
    async fn update(&self, id: &T::Id, record: T) -> StoreResult<T>;

    /// Delete a record, returning whether it existed
    async fn delete(&self, id: &T::Id) -> StoreResult<bool>;

    /// Find records whose field equals `value`
    async fn find_by(&self, field: &str, value: &str) -> StoreResult<Vec<T>>;
}

/// Service trait for the subscriber → author relation between users
///
/// Only user ids are stored; this service knows nothing about the user
/// records themselves.
#[async_trait]
pub trait SubscriptionService: Send + Sync {
    /// Record that `subscriber_id` follows `author_id`; subscribing twice is a no-op
    async fn subscribe(&self, subscriber_id: &Uuid, author_id: &Uuid) -> StoreResult<()>;

    /// Remove the relation, returning whether it existed
    async fn unsubscribe(&self, subscriber_id: &Uuid, author_id: &Uuid) -> StoreResult<bool>;

    /// Ids of users subscribed to `author_id`
    async fn subscribers_of(&self, author_id: &Uuid) -> StoreResult<Vec<Uuid>>;

    /// Ids of users `subscriber_id` is subscribed to
    async fn subscriptions_of(&self, subscriber_id: &Uuid) -> StoreResult<Vec<Uuid>>;

    /// Remove every relation involving `user_id`, in either direction
    async fn delete_by_user(&self, user_id: &Uuid) -> StoreResult<()>;
}
