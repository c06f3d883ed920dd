//! Application state.
//!
//! Shared state for all request handlers.

use std::path::PathBuf;

use mdv_generator::DocGenerator;
use mdv_render::DocsSite;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Markdown documentation below the document root.
    pub(crate) site: DocsSite,
    /// Generator run from the admin endpoint.
    pub(crate) generator: DocGenerator,
    /// Root of the generated documentation tree.
    pub(crate) generated_dir: PathBuf,
    /// Mermaid script loaded by rendered pages.
    pub(crate) mermaid_script: String,
}

impl AppState {
    /// Whether the generated tree has an entry page.
    pub(crate) fn has_generated_docs(&self) -> bool {
        self.generated_dir.join("index.html").is_file()
    }
}
