//! Server host for transport-agnostic API exposure
//!
//! `ServerHost` holds everything an exposure needs (configuration and the
//! data-access store) without knowing which protocol will serve it.

use crate::config::AppConfig;
use crate::core::Store;
use anyhow::Result;
use std::sync::Arc;

/// Host context containing all application state
///
/// # Example
///
/// ```rust,ignore
/// let host = Arc::new(ServerHost::new(config, store)?);
/// let graphql_app = GraphQLExposure::build_router(host)?;
/// ```
pub struct ServerHost {
    /// Validated application configuration
    pub config: Arc<AppConfig>,

    /// Data-access client shared by every resolver
    pub store: Store,
}

impl ServerHost {
    /// Build the host, validating the configuration first
    pub fn new(config: AppConfig, store: Store) -> Result<Self> {
        config.check()?;
        Ok(Self {
            config: Arc::new(config),
            store,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::in_memory_store;

    #[test]
    fn test_new_keeps_config() {
        let mut config = AppConfig::default();
        config.graphql.max_depth = 7;

        let host = ServerHost::new(config, in_memory_store()).unwrap();
        assert_eq!(host.config.graphql.max_depth, 7);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = AppConfig::default();
        config.graphql.max_depth = 0;

        assert!(ServerHost::new(config, in_memory_store()).is_err());
    }
}
