//! Generated documentation tree.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::Response;

use crate::error::ServerError;
use crate::state::AppState;
use crate::static_files::{file_response, resolve_generated};

/// Handle GET /docs_dev and /docs_dev/.
pub(crate) async fn get_root(State(state): State<Arc<AppState>>) -> Result<Response, ServerError> {
    serve_generated(&state, "").await
}

/// Handle GET /docs_dev/{path}.
pub(crate) async fn get_file(
    Path(path): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ServerError> {
    serve_generated(&state, &path).await
}

async fn serve_generated(state: &AppState, path: &str) -> Result<Response, ServerError> {
    let file = resolve_generated(&state.generated_dir, path)
        .ok_or_else(|| ServerError::GeneratedNotFound(path.to_owned()))?;
    file_response(file).await
}
