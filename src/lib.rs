// Library crate for the gallery ingestion service
// Exports modules for use by the server binary and tests

pub mod config;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod middlewares;
pub mod models;
pub mod repositories;
pub mod services;
pub mod state;
pub mod storage;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers::{
    create_label, get_collection, list_collections, list_labels, login, me, upload_collection,
};
use crate::middlewares::auth_middleware;
use crate::state::AppState;

/// Headroom on top of the archive limit for the other form fields and
/// multipart framing
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Build the application router with the given state
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + FORM_OVERHEAD_BYTES;

    // Admin routes (require a bearer token)
    let protected_routes = Router::new()
        .route("/api/auth/me", get(me))
        .route("/api/labels", post(create_label))
        .route(
            "/api/collections",
            post(upload_collection).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/", get(|| async { "Hello, gallery ingest!" }))
        // Public routes
        .route("/api/auth/login", post(login))
        .route("/api/labels", get(list_labels))
        .route("/api/collections", get(list_collections))
        .route("/api/collections/{id}", get(get_collection))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
