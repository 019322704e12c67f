//! Unified service container for the soda review service
//!
//! Holds the store handle and configuration shared by every request.
//! Adapters receive it explicitly (as axum state) instead of reaching
//! for a process-wide connection.

use std::future::Future;
use std::sync::Arc;

use crate::core::config::Config;
use crate::core::error::{Result, ReviewError};
use crate::core::store::{self, MemoryStore, ReviewStore};

/// Unified services container
#[derive(Clone)]
pub struct Services {
    /// Document store holding all reviews
    pub store: Arc<dyn ReviewStore>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl Services {
    /// Create services around an existing store
    pub fn new(config: Config, store: Arc<dyn ReviewStore>) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    /// Create services backed by a fresh in-memory store
    pub fn in_memory(config: Config) -> Self {
        Self::new(config, Arc::new(MemoryStore::new()))
    }

    /// Connect to the configured store and build services around it
    pub async fn connect(config: Config) -> Result<Self> {
        let store = store::connect(&config.store).await?;
        Ok(Self::new(config, store))
    }

    /// Run a store operation under the configured timeout
    ///
    /// Without a timeout a hung store hangs the request, so the
    /// disabled case is only reached when explicitly configured.
    pub async fn with_store_timeout<T, F>(&self, operation: &str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let Some(timeout) = self.config.store.timeout() else {
            return fut.await;
        };

        match tokio::time::timeout(timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                tracing::error!(
                    "Store operation '{}' on {} timed out after {}ms",
                    operation,
                    self.store.name(),
                    timeout.as_millis()
                );
                Err(ReviewError::StoreTimeout {
                    operation: operation.to_string(),
                    timeout_ms: self.config.store.timeout_ms,
                })
            }
        }
    }

    /// Release the store connection
    pub async fn shutdown(&self) {
        tracing::info!("Shutting down {} store", self.store.name());
        self.store.shutdown().await;
    }
}
