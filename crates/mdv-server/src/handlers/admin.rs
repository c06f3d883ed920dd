//! Admin endpoint.
//!
//! Summarizes the documentation and triggers the documentation generator.

use std::sync::Arc;

use axum::extract::State;
use axum::{Form, Json};
use mdv_render::DocEntry;
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Form action that runs the generator.
const GENERATE_ACTION: &str = "generate_pdoc";

/// Documentation summary.
#[derive(Serialize)]
pub(crate) struct AdminSummary {
    /// Top-level documents.
    documents: Vec<DocEntry>,
    /// Number of top-level documents.
    document_count: usize,
    /// Document root on disk.
    document_root: String,
    /// Whether the generated tree has an `index.html`.
    has_generated_docs: bool,
    /// URL of the document listing.
    list_url: String,
    /// URL of the generated documentation.
    generated_url: String,
}

impl AdminSummary {
    fn collect(state: &AppState) -> Self {
        let documents = state.site.list();
        let routes = state.site.routes();
        Self {
            document_count: documents.len(),
            documents,
            document_root: state.site.root().display().to_string(),
            has_generated_docs: state.has_generated_docs(),
            list_url: routes.docs_list(),
            generated_url: routes.generated(""),
        }
    }
}

/// Response for GET and POST /docs/admin.
#[derive(Serialize)]
pub(crate) struct AdminResponse {
    #[serde(flatten)]
    summary: AdminSummary,
    /// Whether the requested action succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    status_ok: Option<bool>,
    /// Outcome message of the requested action.
    #[serde(skip_serializing_if = "Option::is_none")]
    status_message: Option<String>,
}

/// Form posted to /docs/admin.
#[derive(Deserialize)]
pub(crate) struct AdminForm {
    #[serde(default)]
    action: String,
}

/// Handle GET /docs/admin.
pub(crate) async fn get_admin(State(state): State<Arc<AppState>>) -> Json<AdminResponse> {
    Json(AdminResponse {
        summary: AdminSummary::collect(&state),
        status_ok: None,
        status_message: None,
    })
}

/// Handle POST /docs/admin.
pub(crate) async fn post_admin(
    State(state): State<Arc<AppState>>,
    Form(form): Form<AdminForm>,
) -> Json<AdminResponse> {
    let (status_ok, status_message) = if form.action.trim() == GENERATE_ACTION {
        let outcome = state.generator.generate().await;
        (Some(outcome.success), Some(outcome.message))
    } else {
        (None, None)
    };

    // Collected after the run so a fresh generated tree is reported.
    Json(AdminResponse {
        summary: AdminSummary::collect(&state),
        status_ok,
        status_message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_response_omits_missing_status() {
        let response = AdminResponse {
            summary: AdminSummary {
                documents: Vec::new(),
                document_count: 0,
                document_root: "/srv/docs".to_owned(),
                has_generated_docs: false,
                list_url: "/docs/list".to_owned(),
                generated_url: "/docs_dev/".to_owned(),
            },
            status_ok: None,
            status_message: None,
        };

        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["document_count"], 0);
        assert_eq!(json["document_root"], "/srv/docs");
        assert_eq!(json["has_generated_docs"], false);
        assert!(json.get("summary").is_none());
        assert!(json.get("status_ok").is_none());
        assert!(json.get("status_message").is_none());
    }
}
