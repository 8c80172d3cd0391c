//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. CSP nonce (generate per-request nonce for inline scripts)
//! 5. Security headers (CSP, frame and isolation policies)
//! 6. Session layer (tower-sessions, in-memory store)
//! 7. Rate limiting on auth form posts (governor)
//!
//! The session layer is the cart's provider: [`SessionCart`] and
//! [`RequireAuth`] both resolve their state from the session it installs.

pub mod auth;
pub mod cart;
pub mod csp;
pub mod htmx;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{
    AuthRejection, LoginIntent, OptionalAuth, RequireAuth, clear_current_customer,
    set_current_customer,
};
pub use cart::{CartError, SessionCart};
pub use csp::{CspNonce, csp_nonce_middleware};
pub use htmx::HxRequest;
pub use rate_limit::auth_rate_limiter;
pub use request_id::{RequestId, request_id_middleware};
pub use security_headers::security_headers_middleware;
pub use session::{SESSION_COOKIE_NAME, StorefrontSessionLayer, create_session_layer};
