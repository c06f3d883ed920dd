//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::access::{AccessGate, require_access};
use crate::middleware::security;
use crate::state::AppState;

/// Create the application router.
///
/// # Arguments
///
/// * `state` - Shared application state
/// * `gate` - Access gate every route passes
/// * `base_path` - Mount prefix (`""` mounts at the root)
pub(crate) fn create_router(
    state: Arc<AppState>,
    gate: Arc<dyn AccessGate>,
    base_path: &str,
) -> Router {
    let routes = Router::new()
        .route("/docs", get(handlers::docs::get_index))
        .route("/docs/", get(handlers::docs::get_index))
        .route("/docs/list", get(handlers::listing::get_list))
        .route(
            "/docs/admin",
            get(handlers::admin::get_admin).post(handlers::admin::post_admin),
        )
        .route("/docs/{*path}", get(handlers::docs::get_doc))
        .route("/docs_dev", get(handlers::generated::get_root))
        .route("/docs_dev/", get(handlers::generated::get_root))
        .route("/docs_dev/{*path}", get(handlers::generated::get_file))
        .with_state(state);

    let router = if base_path.is_empty() {
        routes
    } else {
        Router::new().nest(base_path, routes)
    };

    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(security::content_type_options_layer())
            .layer(security::frame_options_layer())
            .layer(axum::middleware::from_fn_with_state(gate, require_access)),
    )
}
