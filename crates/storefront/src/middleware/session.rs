//! Session middleware configuration.
//!
//! Sessions live in process memory and carry the customer identity and the
//! cart. The session layer is what provides a cart to handlers; see
//! [`super::SessionCart`].

use secrecy::ExposeSecret;
use tower_sessions::{
    Expiry, MemoryStore, SessionManagerLayer,
    cookie::{Key, KeyError, SameSite, time::Duration},
    service::SignedCookie,
};

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "tl_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Session layer type used by the storefront router.
pub type StorefrontSessionLayer = SessionManagerLayer<MemoryStore, SignedCookie>;

/// Create the session layer with an in-memory store and a signed cookie.
///
/// # Errors
///
/// Returns `KeyError` if the session secret is too short to derive a
/// signing key from. `StorefrontConfig::from_env` already rejects such
/// secrets.
pub fn create_session_layer(config: &StorefrontConfig) -> Result<StorefrontSessionLayer, KeyError> {
    let key = Key::try_from(config.session_secret.expose_secret().as_bytes())?;

    Ok(SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(Duration::seconds(
            SESSION_EXPIRY_SECONDS,
        )))
        .with_secure(config.is_secure())
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_signed(key))
}
