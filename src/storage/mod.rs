//! Storage implementations for different backends

pub mod in_memory;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use in_memory::{InMemoryDataService, InMemorySubscriptionService, in_memory_store};
#[cfg(feature = "postgres")]
pub use postgres::{PostgresDataService, PostgresSubscriptionService, ensure_schema, postgres_store};
