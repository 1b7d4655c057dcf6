//! Integration tests for the Freedom Project PM storefront.
//!
//! Each test boots the full storefront router on an ephemeral port, backed
//! by a `wiremock` product store, and drives it over HTTP with a
//! cookie-keeping `reqwest` client so the session cart persists between
//! requests.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p freedom-project-integration-tests
//! ```

#![allow(clippy::missing_panics_doc)]
#![allow(clippy::indexing_slicing)]

use std::net::{IpAddr, Ipv4Addr};

use freedom_project_storefront::{
    app,
    config::{CatalogConfig, SocialLinks, StorefrontConfig},
    state::AppState,
};
use reqwest::{Client, redirect::Policy};
use secrecy::SecretString;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

/// WhatsApp number configured for every test app.
pub const TEST_PHONE: &str = "5215555555555";

/// Product store table the test apps read from.
pub const TEST_TABLE: &str = "products";

/// A running storefront plus the mock store it loaded its catalog from.
pub struct TestApp {
    pub base_url: String,
    pub client: Client,
    pub state: AppState,
    /// Kept alive for the lifetime of the app.
    pub store: MockServer,
}

impl TestApp {
    /// Boot a storefront whose product store returns `rows`.
    ///
    /// Returns once the catalog load has finished.
    pub async fn spawn(rows: Value) -> Self {
        let store = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/rest/v1/{TEST_TABLE}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(rows))
            .mount(&store)
            .await;

        Self::boot(store).await
    }

    /// Boot a storefront whose product store answers every request with a 500.
    pub async fn spawn_with_failing_store() -> Self {
        let store = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
            .mount(&store)
            .await;

        Self::boot(store).await
    }

    async fn boot(store: MockServer) -> Self {
        let state = AppState::new(test_config(&store.uri())).expect("Failed to build app state");
        state
            .start_catalog_load()
            .await
            .expect("Catalog load task panicked");

        let listener = TcpListener::bind((IpAddr::V4(Ipv4Addr::LOCALHOST), 0))
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");

        let router = app(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("Test server error");
        });

        let client = Client::builder()
            .cookie_store(true)
            .redirect(Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: format!("http://{addr}"),
            client,
            state,
            store,
        }
    }

    /// Absolute URL for `path` on this app.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET `path` and return the response body, asserting a 200.
    pub async fn get_page(&self, path: &str) -> String {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Request failed");
        assert_eq!(resp.status(), 200, "GET {path}");
        resp.text().await.expect("Failed to read body")
    }

    /// Submit a product card's "Agregar al Carrito" button the way HTMX does.
    pub async fn htmx_add(&self, product_id: &str, size: &str) -> reqwest::Response {
        self.client
            .post(self.url("/cart/add"))
            .header("HX-Request", "true")
            .form(&[("product_id", product_id), ("size", size)])
            .send()
            .await
            .expect("Add to cart failed")
    }

    /// Post a cart drawer form the way HTMX does.
    pub async fn htmx_post(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .header("HX-Request", "true")
            .form(form)
            .send()
            .await
            .expect("Cart request failed")
    }

    /// Submit a cart line's quantity form the way HTMX does.
    pub async fn htmx_update(
        &self,
        index: usize,
        product_id: &str,
        size: &str,
        quantity: u64,
    ) -> reqwest::Response {
        let index = index.to_string();
        let quantity = quantity.to_string();
        self.htmx_post(
            "/cart/update",
            &[
                ("index", &index),
                ("product_id", product_id),
                ("size", size),
                ("quantity", &quantity),
            ],
        )
        .await
    }

    /// Submit a cart line's remove form the way HTMX does.
    pub async fn htmx_remove(&self, index: usize, product_id: &str, size: &str) -> reqwest::Response {
        let index = index.to_string();
        self.htmx_post(
            "/cart/remove",
            &[("index", &index), ("product_id", product_id), ("size", size)],
        )
        .await
    }

    /// Current value of the cart count badge.
    pub async fn cart_count(&self) -> u32 {
        let body = self.get_page("/cart/count").await;
        badge_value(&body)
    }
}

/// Storefront configuration pointing at a mock store.
#[must_use]
pub fn test_config(store_url: &str) -> StorefrontConfig {
    StorefrontConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        base_url: "http://localhost:3000".to_string(),
        catalog: CatalogConfig {
            url: store_url.to_string(),
            api_key: SecretString::from("test-anon-key"),
            table: TEST_TABLE.to_string(),
            timeout_secs: 5,
        },
        whatsapp_phone: Some(TEST_PHONE.to_string()),
        social: SocialLinks::default(),
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// A product row as the store returns it.
#[must_use]
pub fn product_row(id: &str, name: &str, price: u32, category: &str, stock: u32, sizes: &[&str]) -> Value {
    json!({
        "id": id,
        "name": name,
        "price": price,
        "category": category,
        "image_url": format!("https://images.example.com/{id}.jpg"),
        "stock": stock,
        "sizes": sizes,
        "created_at": "2024-05-01T12:00:00Z",
    })
}

/// A small catalog covering every category tab plus a sold-out item.
#[must_use]
pub fn sample_catalog() -> Value {
    json!([
        product_row("p1", "Air Max", 120, "sneakers", 10, &["40", "41", "42"]),
        product_row("p2", "Hoodie Negro", 45, "men", 3, &["M", "L"]),
        product_row("p3", "Top Deportivo", 30, "women", 8, &["S", "M"]),
        product_row("p4", "Gorra Clásica", 25, "caps", 0, &["Única"]),
    ])
}

/// Decoded `text` parameter of a `wa.me` redirect.
#[must_use]
pub fn whatsapp_text(location: &str) -> String {
    let url = url::Url::parse(location).expect("Location is not a URL");
    assert_eq!(url.host_str(), Some("wa.me"));
    url.query_pairs()
        .find(|(key, _)| key == "text")
        .map(|(_, value)| value.into_owned())
        .expect("wa.me link has no text parameter")
}

/// `Location` header of a redirect response.
#[must_use]
pub fn location(resp: &reqwest::Response) -> String {
    resp.headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .expect("Response has no Location header")
        .to_string()
}

/// Number shown in a rendered cart count badge.
#[must_use]
pub fn badge_value(fragment: &str) -> u32 {
    let start = fragment.find('>').expect("Badge has no content") + 1;
    let end = fragment[start..].find('<').expect("Badge is not closed") + start;
    fragment[start..end]
        .trim()
        .parse()
        .expect("Badge content is not a number")
}
