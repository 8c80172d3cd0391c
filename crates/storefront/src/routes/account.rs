//! Account route handlers.
//!
//! These routes require authentication.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::filters;
use crate::middleware::{CspNonce, RequireAuth, SessionCart};
use crate::models::CurrentCustomer;
use crate::routes::cart::CartView;

/// Account overview page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/index.html")]
pub struct AccountIndexTemplate {
    pub nonce: String,
    pub customer: Option<CurrentCustomer>,
    pub account: CurrentCustomer,
    pub cart: CartView,
}

/// Display account overview page.
///
/// The `RequireAuth` extractor runs first, so anonymous visitors never
/// reach the body of this handler.
#[instrument(skip_all)]
pub async fn index(
    RequireAuth(account): RequireAuth,
    cart: SessionCart,
    CspNonce(nonce): CspNonce,
) -> impl IntoResponse {
    AccountIndexTemplate {
        nonce,
        customer: Some(account.clone()),
        account,
        cart: CartView::from(cart.cart()),
    }
}
