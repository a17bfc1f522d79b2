//! API route configuration

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{self, AppState};

/// Create the API router with all routes and middleware
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::root))
        // Both spellings are served
        .route("/recommend/:charity_id", get(handlers::recommend))
        .route("/recommendations/:charity_id", get(handlers::recommend))
        .route(
            "/charities",
            get(handlers::list_charities).post(handlers::create_charity),
        )
        .route(
            "/suppliers",
            get(handlers::list_suppliers).post(handlers::create_supplier),
        )
        .route(
            "/ratings",
            get(handlers::list_ratings).post(handlers::create_rating),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
