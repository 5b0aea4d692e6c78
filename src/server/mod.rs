//! Server module for building the HTTP application
//!
//! This module provides a `ServerBuilder` that wires:
//! - the GraphQL endpoint, schema export and playground
//! - health check routes
//! - tracing and CORS layers

pub mod builder;
pub mod exposure;
pub mod host;

pub use builder::ServerBuilder;
pub use exposure::{GraphQLExposure, RestExposure};
pub use host::ServerHost;
