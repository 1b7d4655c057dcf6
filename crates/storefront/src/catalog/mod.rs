//! Product catalog: the store client and the in-memory snapshot.
//!
//! # Lifecycle
//!
//! - The server starts with an empty, *loading* catalog
//! - [`load_catalog_async`] spawns one background read of the product store
//! - Success stores the rows; failure is logged and leaves the catalog empty
//! - Either way the catalog is then *loaded*; there is no reload or retry
//!
//! Requests served while the load is in flight see zero products.

mod client;

use std::sync::{Arc, PoisonError, RwLock};

use freedom_project_core::Product;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info};

pub use client::CatalogClient;

/// Errors that can occur while loading the catalog.
#[derive(Debug, Error)]
pub enum LoadError {
    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store answered with a non-success status.
    #[error("product store returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not a list of products.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Shared catalog snapshot.
///
/// Cheap to clone; all clones see the same snapshot.
#[derive(Clone, Default)]
pub struct Catalog {
    inner: Arc<RwLock<CatalogState>>,
}

#[derive(Default)]
struct CatalogState {
    products: Arc<Vec<Product>>,
    loaded: bool,
}

impl Catalog {
    /// Create an empty catalog awaiting its load.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the startup load has finished (successfully or not).
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .loaded
    }

    /// Current products in store order.
    #[must_use]
    pub fn products(&self) -> Arc<Vec<Product>> {
        Arc::clone(
            &self
                .inner
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .products,
        )
    }

    /// Look up a product by id.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<Product> {
        self.products().iter().find(|p| p.id == *id).cloned()
    }

    /// Store the result of the load and mark the catalog loaded.
    pub(crate) fn set_loaded(&self, products: Vec<Product>) {
        let mut state = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        state.products = Arc::new(products);
        state.loaded = true;
    }
}

/// Load the catalog once and store the result.
///
/// A failed load is logged (and reported to Sentry through the tracing
/// layer) and leaves the catalog empty; the storefront keeps serving.
pub async fn load_catalog(catalog: &Catalog, client: &CatalogClient) {
    match client.load_catalog().await {
        Ok(products) => {
            info!(count = products.len(), "Catalog loaded");
            catalog.set_loaded(products);
        }
        Err(e) => {
            error!(error = %e, "Error fetching products, continuing with an empty catalog");
            catalog.set_loaded(Vec::new());
        }
    }
}

/// Spawn a background task that loads the catalog.
///
/// Must be called from within a Tokio runtime.
pub fn load_catalog_async(catalog: Catalog, client: CatalogClient) -> JoinHandle<()> {
    info!("Spawning background catalog load");
    tokio::spawn(async move {
        load_catalog(&catalog, &client).await;
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use freedom_project_core::{Price, ProductId};
    use secrecy::SecretString;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::config::CatalogConfig;

    fn product(id: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: Price::from_units(50),
            category: "men".to_string(),
            image_url: None,
            stock: 3,
            sizes: vec!["S".to_string()],
            created_at: None,
        }
    }

    fn client_for(server: &MockServer) -> CatalogClient {
        CatalogClient::new(&CatalogConfig {
            url: server.uri(),
            api_key: SecretString::from("eyJhbGciOiJIUzI1NiJ9.test"),
            table: "products".to_string(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_new_catalog_is_empty_and_loading() {
        let catalog = Catalog::new();
        assert!(!catalog.is_loaded());
        assert!(catalog.products().is_empty());
    }

    #[test]
    fn test_set_loaded_is_visible_to_clones() {
        let catalog = Catalog::new();
        let clone = catalog.clone();

        catalog.set_loaded(vec![product("a"), product("b")]);

        assert!(clone.is_loaded());
        assert_eq!(clone.products().len(), 2);
        assert_eq!(clone.find("b").unwrap().id.as_str(), "b");
        assert!(clone.find("z").is_none());
    }

    #[tokio::test]
    async fn test_load_catalog_stores_products_on_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "p1", "name": "Air Max", "price": 120, "category": "sneakers",
                 "stock": 10, "sizes": ["M", "L"]}
            ])))
            .mount(&server)
            .await;

        let catalog = Catalog::new();
        load_catalog_async(catalog.clone(), client_for(&server))
            .await
            .unwrap();

        assert!(catalog.is_loaded());
        assert_eq!(catalog.products().len(), 1);
        assert_eq!(catalog.find("p1").unwrap().name, "Air Max");
    }

    #[tokio::test]
    async fn test_load_catalog_failure_leaves_empty_loaded_catalog() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/products"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let catalog = Catalog::new();
        load_catalog(&catalog, &client_for(&server)).await;

        assert!(catalog.is_loaded());
        assert!(catalog.products().is_empty());
        assert!(freedom_project_core::filter_by_category(&catalog.products(), "all").is_empty());
    }
}
