//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page (hero, featured, how it works, newsletter)
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check
//!
//! # Products
//! GET  /products               - Product listing
//! GET  /products/{handle}      - Product detail
//! GET  /design/{handle}        - Realistic design preview
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart page
//! GET  /cart/drawer            - Cart drawer (fragment)
//! GET  /cart/count             - Cart count badge (fragment)
//! POST /cart/add               - Add to cart, opens the drawer (drawer fragment)
//! POST /cart/update            - Set quantity, <= 0 removes (items fragment)
//! POST /cart/remove            - Remove line (items fragment)
//! POST /cart/clear             - Empty the cart (items fragment)
//! POST /cart/open              - Show drawer (drawer fragment)
//! POST /cart/close             - Hide drawer (drawer fragment)
//!
//! # Checkout (requires auth)
//! GET  /checkout               - Order summary
//!
//! # Notifications
//! GET  /notifications          - Full list
//! GET  /notifications/panel    - Header dropdown (fragment)
//!
//! # Auth
//! GET  /auth/login             - Login page
//! POST /auth/login             - Login action (rate limited)
//! GET  /auth/register          - Register page
//! POST /auth/register          - Register action (rate limited)
//! POST /auth/logout            - Logout action
//!
//! # Account (requires auth)
//! GET  /account                - Account overview
//! ```

pub mod account;
pub mod auth;
pub mod cart;
pub mod design;
pub mod home;
pub mod notifications;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::config::StorefrontConfig;
use crate::middleware::auth_rate_limiter;
use crate::state::AppState;

/// Create the auth routes router.
///
/// Form posts share one per-IP rate limiter; the pages themselves are not
/// limited.
pub fn auth_routes(config: &StorefrontConfig) -> Router<AppState> {
    let limiter = auth_rate_limiter(config.trust_proxy_headers);

    Router::new()
        .route(
            "/login",
            get(auth::login_page).merge(post(auth::login).layer(limiter.clone())),
        )
        .route(
            "/register",
            get(auth::register_page).merge(post(auth::register).layer(limiter)),
        )
        .route("/logout", post(auth::logout))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{handle}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/drawer", get(cart::drawer))
        .route("/count", get(cart::count))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/open", post(cart::open))
        .route("/close", post(cart::close))
}

/// Create the notification routes router.
pub fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(notifications::index))
        .route("/panel", get(notifications::panel))
}

/// Create all routes for the storefront.
pub fn routes(config: &StorefrontConfig) -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Product routes
        .nest("/products", product_routes())
        .route("/design/{handle}", get(design::show))
        // Cart routes
        .nest("/cart", cart_routes())
        .route("/checkout", get(cart::checkout))
        // Notifications
        .nest("/notifications", notification_routes())
        // Account routes (guarded by `RequireAuth`)
        .route("/account", get(account::index))
        // Auth routes
        .nest("/auth", auth_routes(config))
}
