//! Markdown document pages and document assets.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Response};
use mdv_render::DocTarget;

use crate::error::ServerError;
use crate::page::render_page;
use crate::state::AppState;
use crate::static_files::file_response;

/// Document served for the bare `/docs` route.
const INDEX_DOC: &str = "index.md";

/// Handle GET /docs and /docs/.
pub(crate) async fn get_index(State(state): State<Arc<AppState>>) -> Result<Response, ServerError> {
    serve_doc(&state, INDEX_DOC).await
}

/// Handle GET /docs/{path}.
pub(crate) async fn get_doc(
    Path(path): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ServerError> {
    serve_doc(&state, &path).await
}

async fn serve_doc(state: &AppState, path: &str) -> Result<Response, ServerError> {
    match state.site.open(path)? {
        DocTarget::Page(doc) => {
            let page = render_page(&doc, state.site.routes(), &state.mermaid_script);
            Ok(Html(page).into_response())
        }
        DocTarget::Asset(file) => file_response(file).await,
    }
}
