//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /                          - API index
//! GET    /api/health                - Health check (probes the database)
//! GET    /api/ready                 - Readiness check
//!
//! # Auth
//! POST   /api/auth/register         - Create account, set token cookie
//! POST   /api/auth/login            - Log in, set token cookie
//! GET    /api/auth/me               - Current user (auth)
//! POST   /api/auth/logout           - Expire token cookie (auth)
//!
//! # Cart (auth)
//! GET    /api/cart                  - Cart with items
//! DELETE /api/cart                  - Clear cart
//! POST   /api/cart/items            - Add item
//! PUT    /api/cart/items/{item_id}  - Set quantity (0 removes)
//! DELETE /api/cart/items/{item_id}  - Remove item
//!
//! # Dashboard (any authenticated role)
//! GET    /api/dashboard/metrics     - Headline counts and revenue
//! GET    /api/dashboard/health      - Service health rows
//! GET    /api/dashboard/activity    - Audit log feed
//!
//! # Network (public)
//! GET    /api/network/diagnostics   - DNS and reachability probes
//! GET    /api/network/services      - Service discovery description
//! ```

pub mod auth;
pub mod cart;
pub mod dashboard;
pub mod health;
pub mod network;

use std::time::Duration;

use axum::{
    Router,
    http::{
        HeaderValue, Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::{get, post, put},
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultOnResponse, OnResponse, TraceLayer},
};
use tracing::Span;

use crate::error::AppError;
use crate::middleware::{request_id_middleware, security_headers_middleware};
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/me", get(auth::me))
        .route("/logout", post(auth::logout))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/items", post(cart::add_item))
        .route(
            "/items/{item_id}",
            put(cart::update_item).delete(cart::remove_item),
        )
}

/// Create the dashboard routes router.
pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/metrics", get(dashboard::metrics))
        .route("/health", get(dashboard::health))
        .route("/activity", get(dashboard::activity))
}

/// Create the network diagnostics routes router.
pub fn network_routes() -> Router<AppState> {
    Router::new()
        .route("/diagnostics", get(network::diagnostics))
        .route("/services", get(network::services))
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(health::index))
        .route("/api/health", get(health::health))
        .route("/api/ready", get(health::ready))
        .nest("/api/auth", auth_routes())
        .nest("/api/cart", cart_routes())
        .nest("/api/dashboard", dashboard_routes())
        .nest("/api/network", network_routes())
        .fallback(not_found)
}

async fn not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}

/// CORS for the configured frontend origin, with credentials.
///
/// An unparsable origin admits no cross-origin requests.
fn cors_layer(frontend_url: &str) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(60 * 60));

    match HeaderValue::from_str(frontend_url.trim_end_matches('/')) {
        Ok(origin) => cors.allow_origin(origin),
        Err(e) => {
            tracing::warn!(frontend_url, error = %e, "invalid FRONTEND_URL, CORS disabled");
            cors
        }
    }
}

/// Build the full application router with its middleware stack.
///
/// Sentry layers are added by the binary, outside this router.
pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config().frontend_url);

    routes()
        .layer(axum::middleware::from_fn(security_headers_middleware))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        user_id = tracing::field::Empty,
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
        .layer(cors)
        .with_state(state)
}
