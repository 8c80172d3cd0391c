//! CSP nonce middleware for inline script protection.
//!
//! Generates a unique, cryptographically random nonce per request.
//! Templates put it on their inline `<script>` and `<style>` tags, and
//! [`content_security_policy`] puts the same value in the header.

use axum::{
    extract::{FromRequestParts, Request},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use base64::{Engine, engine::general_purpose::STANDARD};
use rand::RngCore;

/// A CSP nonce value for inline scripts.
///
/// Each request gets a unique, cryptographically random nonce (128-bit, base64-encoded).
#[derive(Clone, Debug)]
pub struct CspNonce(pub String);

impl CspNonce {
    /// Generate a new random nonce.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; 16];
        rand::rng().fill_bytes(&mut bytes);
        Self(STANDARD.encode(bytes))
    }

    /// Get the nonce value for use in templates.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

/// Build the `Content-Security-Policy` header value.
///
/// Product mockups and customer artwork come from arbitrary https hosts, so
/// `img-src` allows any https origin. Inline `<script>` and `<style>` tags
/// need the per-request nonce; `style` attributes are allowed because the
/// design preview and colour swatches position and tint elements with them.
#[must_use]
pub fn content_security_policy(nonce: Option<&CspNonce>) -> String {
    let nonce_source = nonce
        .filter(|n| !n.value().is_empty())
        .map(|n| format!(" 'nonce-{}'", n.value()))
        .unwrap_or_default();

    format!(
        "default-src 'none'; \
         script-src 'self'{nonce_source}; \
         style-src 'self'{nonce_source}; \
         style-src-attr 'unsafe-inline'; \
         font-src 'self'; \
         img-src 'self' https: data:; \
         connect-src 'self'; \
         frame-src 'none'; \
         object-src 'none'; \
         base-uri 'self'; \
         form-action 'self'; \
         frame-ancestors 'none'"
    )
}

/// Middleware that generates a CSP nonce and stores it in request extensions.
///
/// Must be added before `security_headers_middleware` in the middleware stack
/// so the nonce is available when building the CSP header.
pub async fn csp_nonce_middleware(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(CspNonce::generate());
    next.run(request).await
}

/// Extractor to get the CSP nonce from request extensions.
///
/// # Example
///
/// ```ignore
/// async fn handler(CspNonce(nonce): CspNonce) -> impl IntoResponse {
///     MyTemplate { nonce, /* ... */ }
/// }
/// ```
impl<S> FromRequestParts<S> for CspNonce
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<Self>().cloned().unwrap_or_else(|| {
            tracing::warn!(
                "CSP nonce not found in request extensions - middleware may be misconfigured"
            );
            Self(String::new())
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nonces_are_unique_and_base64() {
        let a = CspNonce::generate();
        let b = CspNonce::generate();
        assert_ne!(a.value(), b.value());
        assert_eq!(a.value().len(), 24);
        assert!(STANDARD.decode(a.value()).is_ok());
    }

    #[test]
    fn test_policy_carries_nonce() {
        let nonce = CspNonce("abc123".to_string());
        let policy = content_security_policy(Some(&nonce));
        assert!(policy.contains("script-src 'self' 'nonce-abc123';"));
        assert!(policy.contains("style-src 'self' 'nonce-abc123';"));
        assert!(policy.contains("style-src-attr 'unsafe-inline';"));
        assert!(policy.contains("frame-ancestors 'none'"));
    }

    #[test]
    fn test_policy_without_nonce() {
        let policy = content_security_policy(None);
        assert!(policy.contains("script-src 'self';"));
        assert!(!policy.contains("nonce-"));

        let empty = CspNonce(String::new());
        assert!(!content_security_policy(Some(&empty)).contains("nonce-"));
    }
}
