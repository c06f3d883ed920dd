//! Static file serving.
//!
//! Serves document assets and the generated documentation tree straight
//! from disk.

use std::path::{Path, PathBuf};

use axum::body::Body;
use axum::http::{StatusCode, header};
use axum::response::Response;
use mdv_render::normalize_relative;

use crate::error::ServerError;

/// Entry page of a generated-docs directory.
const INDEX_FILE: &str = "index.html";

/// Map a request path to a file in the generated tree.
///
/// An empty path means the root `index.html`. When the file is missing,
/// `index.html` of the requested directory (or, failing that, of its parent)
/// is served instead. Returns `None` for escaping paths and misses.
pub(crate) fn resolve_generated(root: &Path, request_path: &str) -> Option<PathBuf> {
    let normalized = normalize_relative(request_path)?;
    let relative = if normalized.is_empty() {
        INDEX_FILE.to_owned()
    } else {
        normalized
    };

    let full_path = root.join(&relative);
    if full_path.is_file() {
        return Some(full_path);
    }
    if relative.ends_with(INDEX_FILE) {
        return None;
    }

    let dir_index = full_path.join(INDEX_FILE);
    if dir_index.is_file() {
        return Some(dir_index);
    }
    let sibling_index = full_path.parent()?.join(INDEX_FILE);
    sibling_index.is_file().then_some(sibling_index)
}

/// Content type for a served file.
fn content_type(path: &Path) -> String {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("html") => "text/html".to_owned(),
        Some("css") => "text/css".to_owned(),
        Some("js") => "application/javascript".to_owned(),
        _ => mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_owned(),
    }
}

/// Read `path` into a response with a matching content type.
pub(crate) async fn file_response(path: PathBuf) -> Result<Response, ServerError> {
    let content = match tokio::fs::read(&path).await {
        Ok(content) => content,
        Err(source) => return Err(ServerError::Read { path, source }),
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type(&path))
        .body(Body::from(content))
        .map_err(|e| ServerError::Read {
            path,
            source: std::io::Error::other(e),
        })
}
