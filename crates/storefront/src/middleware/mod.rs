//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request span, see [`make_request_span`])
//! 3. Request ID (recorded on the request span)
//! 4. Security headers (CSP, frame options, etc.)
//! 5. Session layer (tower-sessions with a bounded moka store)

pub mod htmx;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use htmx::HxRequest;
pub use request_id::{make_request_span, request_id_middleware};
pub use security_headers::security_headers_middleware;
pub use session::{create_session_layer, create_session_store};
