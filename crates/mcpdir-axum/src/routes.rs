//! Route definitions and router construction.

use axum::Router;
use axum::routing::get;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::bootstrap::{AxumContext, CorsConfig};
use crate::handlers;
use crate::state::AppState;

/// Build CORS layer from configuration.
fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    match config {
        CorsConfig::AllowAll => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        CorsConfig::AllowOrigins(origins) => {
            use axum::http::HeaderValue;
            let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            CorsLayer::new()
                .allow_origin(allowed)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    }
}

/// API routes without the `/api` prefix.
///
/// Axum 0.8 uses brace syntax for path parameters. `search` is registered
/// as a static segment so it wins over `{id}`.
pub(crate) fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/servers/search", get(handlers::servers::search))
        .route("/servers/{id}", get(handlers::servers::detail))
        .route("/servers/{id}/tools", get(handlers::servers::tools))
        .route("/servers/{id}/health", get(handlers::servers::health))
        .route("/servers/{id}/changelog", get(handlers::servers::changelog))
        .route(
            "/servers/{id}/compatibility",
            get(handlers::servers::compatibility),
        )
}

/// Main router: `/health` plus everything under `/api`.
///
/// Preflight requests are answered by the CORS layer.
pub fn create_router(ctx: AxumContext, cors_config: &CorsConfig) -> Router {
    let state: AppState = Arc::new(ctx);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes().with_state(state))
        .layer(build_cors_layer(cors_config))
        .layer(TraceLayer::new_for_http())
}

/// Health check endpoint.
pub(crate) async fn health_check() -> &'static str {
    "OK"
}
