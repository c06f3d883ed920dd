//! Document listing endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use mdv_render::DocEntry;
use serde::Serialize;

use crate::state::AppState;

/// Response for GET /docs/list.
#[derive(Serialize)]
pub(crate) struct ListResponse {
    /// Top-level documents sorted by file name.
    files: Vec<DocEntry>,
}

/// Handle GET /docs/list.
pub(crate) async fn get_list(State(state): State<Arc<AppState>>) -> Json<ListResponse> {
    Json(ListResponse {
        files: state.site.list(),
    })
}
