//! HTTP adapters - REST API implementations.
//!
//! `api_router` assembles the full service: entitlement routes under `/api`
//! behind the context middleware, an unauthenticated `/health`, and the
//! tower-http layers for tracing, timeouts, CORS and request ids.

pub mod entitlement;
pub mod middleware;

use axum::http::HeaderValue;
use axum::routing::get;
use axum::{Json, Router};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

pub use entitlement::{entitlement_routes, EntitlementApiError, EntitlementAppState};
pub use middleware::{context_middleware, RequireContext};

/// Build the application router.
pub fn api_router(state: EntitlementAppState, server: &ServerConfig) -> Router {
    let api = entitlement_routes().layer(axum::middleware::from_fn_with_state(
        state.context_state(),
        context_middleware,
    ));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .with_state(state)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&server.cors_origins_list()))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

// No configured origins means no cross-origin access.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if allowed.is_empty() {
        return CorsLayer::new();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}
