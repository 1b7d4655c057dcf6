//! HTTP client for the product store.
//!
//! The store speaks `PostgREST` (the Supabase REST API): a table is read
//! with `GET /rest/v1/{table}` and ordering is expressed as a query
//! parameter.

use std::sync::Arc;
use std::time::Duration;

use freedom_project_core::Product;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument, warn};

use super::LoadError;
use crate::config::CatalogConfig;

/// Maximum number of response body characters kept in errors and logs.
const BODY_EXCERPT_CHARS: usize = 200;

/// Client for the product store.
///
/// Issues exactly one kind of request: read every product ordered by
/// category. No retries, no caching, no pagination.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    endpoint: String,
    api_key: SecretString,
}

impl CatalogClient {
    /// Create a new product store client.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &CatalogConfig) -> Result<Self, LoadError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let endpoint = format!(
            "{}/rest/v1/{}?select=*&order=category.asc",
            config.url.trim_end_matches('/'),
            urlencoding::encode(&config.table),
        );

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                endpoint,
                api_key: config.api_key.clone(),
            }),
        })
    }

    /// Fetch all products ordered by category, as the store returns them.
    ///
    /// # Errors
    ///
    /// - [`LoadError::Http`] if the request could not be sent or read
    /// - [`LoadError::Status`] if the store answered with a non-2xx status
    /// - [`LoadError::Parse`] if the body is not a JSON array
    ///
    /// Individual rows that do not describe a product (a `null` price, a
    /// negative stock) are logged and skipped.
    #[instrument(skip(self), fields(endpoint = %self.inner.endpoint))]
    pub async fn load_catalog(&self) -> Result<Vec<Product>, LoadError> {
        let api_key = self.inner.api_key.expose_secret();

        let response = self
            .inner
            .client
            .get(&self.inner.endpoint)
            .header("apikey", api_key)
            .header("Authorization", format!("Bearer {api_key}"))
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(LoadError::Status {
                status: status.as_u16(),
                body: excerpt(&body),
            });
        }

        let rows: Vec<serde_json::Value> = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %excerpt(&body),
                "Failed to parse product rows"
            );
            LoadError::Parse(e)
        })?;

        let products: Vec<Product> = rows.into_iter().filter_map(parse_row).collect();

        debug!(count = products.len(), "Fetched product rows");
        Ok(products)
    }
}

/// Parse one product row, skipping it if it does not describe a product.
fn parse_row(row: serde_json::Value) -> Option<Product> {
    let id = row.get("id").map(ToString::to_string);
    match serde_json::from_value(row) {
        Ok(product) => Some(product),
        Err(e) => {
            warn!(error = %e, id = ?id, "Skipping malformed product row");
            None
        }
    }
}

fn excerpt(body: &str) -> String {
    body.chars().take(BODY_EXCERPT_CHARS).collect()
}
