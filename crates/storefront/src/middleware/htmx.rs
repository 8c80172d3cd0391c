//! HTMX request detection.
//!
//! Cart and auth handlers answer HTMX requests with a fragment and plain
//! form posts with a redirect, so the storefront works without JavaScript.

use axum::{extract::FromRequestParts, http::request::Parts};

/// Header HTMX sets on every request it issues.
pub const HX_REQUEST_HEADER: &str = "hx-request";

/// Header used to fire client-side events after a swap.
pub const HX_TRIGGER_HEADER: &str = "HX-Trigger";

/// Event fired whenever the session cart changes.
pub const CART_UPDATED_EVENT: &str = "cart-updated";

/// Whether the current request was issued by HTMX.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HxRequest(pub bool);

impl<S> FromRequestParts<S> for HxRequest
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

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

    async fn detect(header: Option<&str>) -> bool {
        let mut builder = Request::builder().uri("/cart/add");
        if let Some(value) = header {
            builder = builder.header(HX_REQUEST_HEADER, value);
        }
        let (mut parts, ()) = builder.body(()).unwrap().into_parts();
        let HxRequest(is_htmx) = HxRequest::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        is_htmx
    }

    #[tokio::test]
    async fn test_detects_htmx_header() {
        assert!(detect(Some("true")).await);
        assert!(!detect(Some("false")).await);
        assert!(!detect(None).await);
    }
}
