//! Application state shared across handlers.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::catalog::{self, Catalog, CatalogClient, LoadError};
use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// configuration, the catalog snapshot, and the product store client.
/// Visitor carts are not here; they live in each visitor's session.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    catalog_client: CatalogClient,
}

impl AppState {
    /// Create a new application state with an empty, loading catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the product store HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, LoadError> {
        let catalog_client = CatalogClient::new(&config.catalog)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog: Catalog::new(),
                catalog_client,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog snapshot.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Start the one-shot catalog load in the background.
    pub fn start_catalog_load(&self) -> JoinHandle<()> {
        catalog::load_catalog_async(
            self.inner.catalog.clone(),
            self.inner.catalog_client.clone(),
        )
    }
}
