//! Router assembly.
//!
//! Shared by the binary and the router tests so both exercise the same
//! middleware stack.

use std::time::Duration;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    middleware::from_fn,
    routing::get,
};
use tower_http::{
    services::ServeDir,
    trace::{DefaultOnResponse, OnResponse, TraceLayer},
};
use tower_sessions::cookie::KeyError;
use tracing::Span;

use crate::middleware::{
    create_session_layer, csp_nonce_middleware, request_id_middleware,
    security_headers_middleware,
};
use crate::routes;
use crate::state::AppState;

/// Build the storefront router with its full middleware stack.
///
/// Layers, outermost first: Sentry, request tracing, request id, CSP nonce,
/// security headers, session. Every route, including static files, sits
/// inside the session layer.
///
/// # Errors
///
/// Returns `KeyError` if the session secret cannot be used as a cookie
/// signing key.
pub fn build_router(state: AppState) -> Result<Router, KeyError> {
    let session_layer = create_session_layer(state.config())?;
    let static_dir = ServeDir::new(&state.config().static_dir);

    let app = Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes(state.config()))
        .nest_service("/static", static_dir)
        .layer(session_layer)
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(csp_nonce_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: Duration, span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    Ok(app)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Ready once a non-empty catalog is loaded; 503 otherwise.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    if state.catalog().all().is_empty() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    }
}
