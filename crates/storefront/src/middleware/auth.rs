//! Authentication extractors and the route guard.
//!
//! [`RequireAuth`] guards a handler: it runs before the handler body and
//! either yields the logged-in customer or short-circuits. HTML navigation
//! is sent back to the home page with a [`LoginIntent`] so the login dialog
//! opens and the customer lands where they were going after signing in.

use axum::{
    extract::{FromRequestParts, OriginalUri},
    http::{StatusCode, Uri, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Deserializer};
use tower_sessions::Session;

use crate::models::{CurrentCustomer, session_keys};

/// Where to go after a successful login when no valid target was carried.
pub const DEFAULT_LOGIN_TARGET: &str = "/account";

/// Intent attached to a guard redirect.
///
/// Encoded as the query string of the redirect to `/`, and accepted back by
/// the home and login pages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoginIntent {
    /// The location the customer originally asked for.
    pub redirect_to: Option<String>,
    /// Whether the page should open the login dialog.
    #[serde(default, deserialize_with = "lenient_flag")]
    pub login: bool,
}

/// `true` for `true` or `1`; any other value, or none, is `false`.
///
/// The home page is a landing page, so a stray `login=yes` must not turn
/// into a 400.
fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(matches!(raw.as_deref(), Some("true" | "1")))
}

impl LoginIntent {
    /// Intent for a blocked navigation to `location`.
    #[must_use]
    pub fn for_location(location: &Uri) -> Self {
        let original = location
            .path_and_query()
            .map_or_else(|| location.path().to_string(), ToString::to_string);

        Self {
            redirect_to: Some(original),
            login: true,
        }
    }

    /// Redirect target carrying this intent to the site root.
    #[must_use]
    pub fn root_url(&self) -> String {
        match &self.redirect_to {
            Some(target) => format!(
                "/?redirect_to={}&login={}",
                urlencoding::encode(target),
                self.login
            ),
            None if self.login => "/?login=true".to_string(),
            None => "/".to_string(),
        }
    }

    /// The carried location if it is safe to redirect to, else the default.
    #[must_use]
    pub fn safe_target(&self) -> &str {
        self.redirect_to
            .as_deref()
            .filter(|target| is_local_path(target))
            .unwrap_or(DEFAULT_LOGIN_TARGET)
    }
}

/// Whether `target` is a path on this site.
///
/// Rejects absolute URLs, scheme-relative `//host` and backslash tricks so a
/// crafted `redirect_to` cannot bounce the customer to another origin.
#[must_use]
pub fn is_local_path(target: &str) -> bool {
    target.starts_with('/')
        && !target.starts_with("//")
        && !target.contains('\\')
        && !target.chars().any(char::is_control)
}

/// Extractor that requires customer authentication.
///
/// If the customer is not logged in, HTML requests are redirected to the
/// home page with the login intent attached; `/api/` requests get 401.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(customer): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", customer.display_name)
/// }
/// ```
pub struct RequireAuth(pub CurrentCustomer);

/// Rejection returned when authentication is required but missing.
#[derive(Debug)]
pub enum AuthRejection {
    /// Redirect to the home page and open the login dialog (HTML requests).
    RedirectToLogin(LoginIntent),
    /// Unauthorized response (API requests).
    Unauthorized,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin(intent) => Redirect::to(&intent.root_url()).into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

/// The URI as the client sent it, before any `Router::nest` prefix stripping.
fn original_uri(parts: &Parts) -> &Uri {
    parts
        .extensions
        .get::<OriginalUri>()
        .map_or(&parts.uri, |original| &original.0)
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AuthRejection::Unauthorized)?;

        let customer = session
            .get::<CurrentCustomer>(session_keys::CURRENT_CUSTOMER)
            .await
            .ok()
            .flatten();

        customer.map(Self).ok_or_else(|| {
            let uri = original_uri(parts);
            if uri.path().starts_with("/api/") {
                AuthRejection::Unauthorized
            } else {
                tracing::debug!(path = %uri.path(), "Unauthenticated navigation redirected");
                AuthRejection::RedirectToLogin(LoginIntent::for_location(uri))
            }
        })
    }
}

/// Extractor that optionally gets the current customer.
///
/// Unlike `RequireAuth`, this does not reject the request if the customer is
/// not logged in.
pub struct OptionalAuth(pub Option<CurrentCustomer>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let customer = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<CurrentCustomer>(session_keys::CURRENT_CUSTOMER)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(Self(customer))
    }
}

/// Store the logged-in customer in the session.
///
/// Rotates the session id first so a pre-login session id cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_customer(
    session: &Session,
    customer: &CurrentCustomer,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session
        .insert(session_keys::CURRENT_CUSTOMER, customer)
        .await
}

/// Clear the current customer from the session (logout). The cart stays.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_customer(
    session: &Session,
) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentCustomer>(session_keys::CURRENT_CUSTOMER)
        .await?;
    Ok(())
}
