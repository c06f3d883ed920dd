//! Error types for the HTTP server.

use std::path::PathBuf;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mdv_render::RenderError;

/// Server error type.
///
/// Every variant answers with a bare 404; the cause is only logged.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ServerError {
    /// Document could not be opened.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Generated-docs path escapes the root or does not exist.
    #[error("Generated file not found: {0}")]
    GeneratedNotFound(String),

    /// File exists but could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        /// File that failed to read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        tracing::debug!(error = %self, "Request rejected");
        (StatusCode::NOT_FOUND, "Not Found").into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_hide_details() {
        let response =
            ServerError::Render(RenderError::OutsideRoot("../../etc/passwd".to_owned()))
                .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_read_error_is_not_found() {
        let response = ServerError::Read {
            path: PathBuf::from("/docs/locked.md"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
