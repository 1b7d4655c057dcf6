//! Session middleware configuration.
//!
//! Sessions hold the visitor's cart. They live in process memory only: a
//! restart, or the browser discarding its session cookie, empties the cart.
//! The store is a bounded moka cache that evicts records once they expire
//! or the capacity is reached.

use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_moka_store::MokaStore;

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "fp_session";

/// Most sessions kept at once; the least recently used are evicted first.
pub const MAX_SESSIONS: u64 = 100_000;

/// Create the bounded in-memory session store.
#[must_use]
pub fn create_session_store() -> MokaStore {
    MokaStore::new(Some(MAX_SESSIONS))
}

/// Create the session layer.
///
/// The cookie has no `Max-Age`, so it ends with the browser session.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<MokaStore> {
    SessionManagerLayer::new(create_session_store())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnSessionEnd)
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use tower_sessions::{
        SessionStore,
        cookie::time::{Duration, OffsetDateTime},
        session::{Id, Record},
    };

    use super::*;

    fn record() -> Record {
        let mut data = HashMap::new();
        data.insert("cart".to_string(), serde_json::json!({ "lines": [] }));
        Record {
            id: Id::default(),
            data,
            expiry_date: OffsetDateTime::now_utc() + Duration::hours(1),
        }
    }

    #[tokio::test]
    async fn test_session_store_keeps_and_deletes_records() {
        let store = create_session_store();
        let mut record = record();

        store.create(&mut record).await.unwrap();
        let loaded = store.load(&record.id).await.unwrap().unwrap();
        assert_eq!(loaded.data, record.data);

        store.delete(&record.id).await.unwrap();
        assert!(store.load(&record.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_session_loads_nothing() {
        let store = create_session_store();
        assert!(store.load(&Id::default()).await.unwrap().is_none());
    }
}
