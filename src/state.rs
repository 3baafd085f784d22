//! Application state management

use std::sync::Arc;

use crate::auth::AuthLookup;
use crate::config::Config;
use crate::storage::BlobStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    store: Arc<dyn BlobStore>,
    auth: Arc<dyn AuthLookup>,
}

impl AppState {
    /// Create a new application state
    pub fn new(config: Config, store: Arc<dyn BlobStore>, auth: Arc<dyn AuthLookup>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                auth,
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the blob store
    pub fn store(&self) -> &dyn BlobStore {
        self.inner.store.as_ref()
    }

    /// Get the auth lookup
    pub fn auth(&self) -> &dyn AuthLookup {
        self.inner.auth.as_ref()
    }
}
