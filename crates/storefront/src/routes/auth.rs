//! Authentication route handlers.
//!
//! Handles login, registration and logout against the in-memory customer
//! directory. Logging in stores a [`CurrentCustomer`] in the session; the
//! session cart is left untouched by both login and logout.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{
    CspNonce, LoginIntent, OptionalAuth, clear_current_customer, set_current_customer,
};
use crate::models::CurrentCustomer;
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub redirect_to: Option<String>,
}

/// Registration form data.
#[derive(Deserialize)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    pub name: Option<String>,
}

// =============================================================================
// Query Types
// =============================================================================

/// Query parameters of the login page.
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub error: Option<String>,
    pub redirect_to: Option<String>,
}

/// Message for a login error code carried in the query string.
fn login_error_message(code: &str) -> &'static str {
    match code {
        "credentials" => "That email and password don't match an account.",
        "session" => "We couldn't sign you in. Please try again.",
        _ => "Something went wrong. Please try again.",
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub nonce: String,
    pub customer: Option<CurrentCustomer>,
    pub error: Option<&'static str>,
    pub redirect_to: String,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub nonce: String,
    pub customer: Option<CurrentCustomer>,
    pub error: Option<String>,
    pub email: String,
    pub name: String,
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
#[instrument(skip_all)]
pub async fn login_page(
    CspNonce(nonce): CspNonce,
    OptionalAuth(customer): OptionalAuth,
    Query(query): Query<LoginQuery>,
) -> impl IntoResponse {
    let intent = LoginIntent {
        redirect_to: query.redirect_to,
        login: true,
    };

    LoginTemplate {
        nonce,
        customer,
        error: query.error.as_deref().map(login_error_message),
        redirect_to: intent.safe_target().to_string(),
    }
}

/// Handle login form submission.
///
/// On success redirects to `redirect_to` when it is a local path, otherwise
/// to the account page. Failures go back to the login page with the target
/// preserved.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let intent = LoginIntent {
        redirect_to: form.redirect_to,
        login: false,
    };
    let target = intent.safe_target();

    let customer = match AuthService::new(state.customers())
        .login_with_password(&form.email, &form.password)
        .await
    {
        Ok(customer) => customer,
        Err(AuthError::InvalidCredentials | AuthError::InvalidEmail(_)) => {
            tracing::warn!("Login failed: invalid credentials");
            let retry = format!(
                "/auth/login?error=credentials&redirect_to={}",
                urlencoding::encode(target)
            );
            return Ok(Redirect::to(&retry).into_response());
        }
        Err(e) => return Err(e.into()),
    };

    set_current_customer(&session, &customer).await?;
    set_sentry_user(customer.email.as_str());
    tracing::info!(email = %customer.email, "Customer logged in");

    Ok(Redirect::to(target).into_response())
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
#[instrument(skip_all)]
pub async fn register_page(
    CspNonce(nonce): CspNonce,
    OptionalAuth(customer): OptionalAuth,
) -> impl IntoResponse {
    RegisterTemplate {
        nonce,
        customer,
        error: None,
        email: String::new(),
        name: String::new(),
    }
}

/// Handle registration form submission.
///
/// A new account is logged in straight away. Validation failures re-render
/// the form with the error and the status of the underlying `AuthError`
/// (409 for a taken email, 400 otherwise).
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    CspNonce(nonce): CspNonce,
    Form(form): Form<RegisterForm>,
) -> Result<Response> {
    let result = AuthService::new(state.customers())
        .register_with_password(
            &form.email,
            &form.password,
            &form.password_confirm,
            form.name.as_deref(),
        )
        .await;

    let customer = match result {
        Ok(customer) => customer,
        Err(AuthError::PasswordHash) => return Err(AuthError::PasswordHash.into()),
        Err(e) => {
            tracing::warn!(error = %e, "Registration rejected");
            let err = AppError::from(e);
            let status = err.status();
            let message = register_error_message(&err);
            return Ok((
                status,
                RegisterTemplate {
                    nonce,
                    customer: None,
                    error: Some(message),
                    email: form.email,
                    name: form.name.unwrap_or_default(),
                },
            )
                .into_response());
        }
    };

    set_current_customer(&session, &customer).await?;
    set_sentry_user(customer.email.as_str());

    Ok(Redirect::to("/account").into_response())
}

fn register_error_message(err: &AppError) -> String {
    match err {
        AppError::Auth(AuthError::UserAlreadyExists) => {
            "An account with this email already exists.".to_string()
        }
        AppError::Auth(AuthError::InvalidEmail(_)) => "Please enter a valid email address.".to_string(),
        AppError::Auth(AuthError::PasswordMismatch) => "Passwords do not match.".to_string(),
        AppError::Auth(AuthError::WeakPassword(msg)) => {
            let mut message = msg.clone();
            if let Some(first) = message.get_mut(..1) {
                first.make_ascii_uppercase();
            }
            format!("{message}.")
        }
        _ if err.status() == StatusCode::BAD_REQUEST => err.to_string(),
        _ => "Registration failed. Please try again.".to_string(),
    }
}

// =============================================================================
// Logout Route
// =============================================================================

/// Handle logout.
///
/// Removes the customer from the session. The session itself, and with it
/// the cart, survives.
#[instrument(skip_all)]
pub async fn logout(session: Session) -> Result<Response> {
    clear_current_customer(&session).await?;
    clear_sentry_user();
    Ok(Redirect::to("/").into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_error_messages() {
        assert_eq!(
            login_error_message("credentials"),
            "That email and password don't match an account."
        );
        assert_eq!(
            login_error_message("whatever"),
            "Something went wrong. Please try again."
        );
    }

    #[test]
    fn test_register_error_messages() {
        assert_eq!(
            register_error_message(&AuthError::UserAlreadyExists.into()),
            "An account with this email already exists."
        );
        assert_eq!(
            register_error_message(
                &AuthError::WeakPassword("password must be at least 8 characters".to_string())
                    .into()
            ),
            "Password must be at least 8 characters."
        );
    }
}
