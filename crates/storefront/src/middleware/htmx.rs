//! HTMX request detection.
//!
//! Cart endpoints answer HTMX requests with HTML fragments and plain form
//! posts (JavaScript disabled) with a redirect to the full page.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};

/// Header HTMX sets on every request it issues.
pub const HX_REQUEST_HEADER: &str = "hx-request";

/// Whether the request was issued by HTMX.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HxRequest(pub bool);

impl<S> FromRequestParts<S> for HxRequest
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let is_htmx = parts
            .headers
            .get(HX_REQUEST_HEADER)
            .is_some_and(|value| value.as_bytes() == b"true");
        Ok(Self(is_htmx))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::Request;

    use super::*;

    async fn extract(request: Request<()>) -> HxRequest {
        let (mut parts, ()) = request.into_parts();
        HxRequest::from_request_parts(&mut parts, &()).await.unwrap()
    }

    #[tokio::test]
    async fn test_detects_htmx_header() {
        let request = Request::builder()
            .header(HX_REQUEST_HEADER, "true")
            .body(())
            .unwrap();
        assert_eq!(extract(request).await, HxRequest(true));
    }

    #[tokio::test]
    async fn test_plain_request_is_not_htmx() {
        let request = Request::builder().body(()).unwrap();
        assert_eq!(extract(request).await, HxRequest(false));
    }
}
