//! Typed error handling for the data-access layer
//!
//! Resolvers never see raw backend errors. Every failure coming out of a
//! [`DataService`](crate::core::DataService) or the [`Store`](crate::core::Store)
//! is a [`StoreError`], which carries a stable error code that ends up in the
//! `extensions.code` of the GraphQL error entry.
//!
//! # Example
//!
//! ```rust,ignore
//! match store.create_post(dto).await {
//!     Ok(post) => println!("created {}", post.id),
//!     Err(StoreError::ForeignKey { field, .. }) => println!("bad reference: {}", field),
//!     Err(e) => eprintln!("{} ({})", e, e.error_code()),
//! }
//! ```

use async_graphql::ErrorExtensions;
use thiserror::Error;

/// Errors raised by the data-access layer
#[derive(Debug, Error)]
pub enum StoreError {
    /// Record was not found
    #[error("{resource} with id '{id}' not found")]
    NotFound { resource: &'static str, id: String },

    /// A unique constraint would be violated
    #[error("{resource} with {field} '{value}' already exists")]
    AlreadyExists {
        resource: &'static str,
        field: &'static str,
        value: String,
    },

    /// A referenced record does not exist
    #[error("{resource}.{field} references missing record '{value}'")]
    ForeignKey {
        resource: &'static str,
        field: &'static str,
        value: String,
    },

    /// The request is well-formed but not allowed by the data model
    #[error("invalid {resource}: {message}")]
    Invalid {
        resource: &'static str,
        message: String,
    },

    /// Storage backend failure (lock poisoning, SQL error, decoding error)
    #[error("storage backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Stable error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            StoreError::NotFound { .. } => "NOT_FOUND",
            StoreError::AlreadyExists { .. } => "ALREADY_EXISTS",
            StoreError::ForeignKey { .. } => "FOREIGN_KEY_VIOLATION",
            StoreError::Invalid { .. } => "BAD_USER_INPUT",
            StoreError::Backend(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Shorthand for a not-found error on any displayable id
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        StoreError::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    /// Shorthand for a backend failure
    pub fn backend(err: impl std::fmt::Display) -> Self {
        StoreError::Backend(err.to_string())
    }
}

impl ErrorExtensions for StoreError {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.to_string()).extend_with(|_, e| {
            e.set("code", self.error_code());
        })
    }
}

#[cfg(feature = "postgres")]
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Backend(format!("serialization failed: {}", err))
    }
}

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file could not be read
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// YAML could not be parsed into the config structure
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Parsed values are out of range
    #[error("invalid config: {0}")]
    Invalid(#[from] validator::ValidationErrors),

    /// Backend selection is inconsistent with the compiled features or settings
    #[error("unsupported storage configuration: {0}")]
    Storage(String),
}
