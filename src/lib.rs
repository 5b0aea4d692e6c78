//! # graphql-service
//!
//! A GraphQL CRUD API for a small blogging domain: member types, users,
//! profiles, posts and user-to-author subscriptions.
//!
//! ## Features
//!
//! - **Typed schema**: queries, nested relations and mutations over async-graphql
//! - **Depth limiting**: every operation is checked against a configurable maximum depth before execution
//! - **Pluggable storage**: in-memory by default, PostgreSQL behind the `postgres` feature
//! - **Referential rules**: one profile per user, cascading user deletion, no self-subscription
//! - **YAML configuration** validated at load time
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use graphql_service::prelude::*;
//!
//! let store = in_memory_store();
//! store.seed_member_types().await?;
//!
//! ServerBuilder::new()
//!     .with_config(AppConfig::default())
//!     .with_store(store)
//!     .serve("127.0.0.1:8000")
//!     .await?;
//! ```

pub mod config;
pub mod core;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        ChangePostDto, ChangeProfileDto, ChangeUserDto, CreatePostDto, CreateProfileDto,
        CreateUserDto, DataService, MemberType, MemberTypeId, Post, Profile, Record, Store,
        StoreError, StoreResult, SubscriberOnAuthor, SubscriptionService, User,
    };

    // === Storage ===
    pub use crate::storage::{InMemoryDataService, InMemorySubscriptionService, in_memory_store};
    #[cfg(feature = "postgres")]
    pub use crate::storage::{
        PostgresDataService, PostgresSubscriptionService, ensure_schema, postgres_store,
    };

    // === Config ===
    pub use crate::config::{AppConfig, GraphQLConfig, ServerConfig, StorageBackend, StorageConfig};

    // === Server ===
    pub use crate::server::exposure::graphql::{DepthLimit, GraphQLService};
    pub use crate::server::{ServerBuilder, ServerHost};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use uuid::Uuid;
}
