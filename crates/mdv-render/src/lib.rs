//! Markdown rendering and link rewriting for the mdv documentation viewer.
//!
//! Documents live below a document root. Rendering one runs a fixed
//! pipeline:
//!
//! ```text
//! source ──► LinkRewriter ──► markdown::to_html ──► DiagramPostProcessor ──► HTML
//!            (markdown level)                       (HTML level)
//! ```
//!
//! Link targets are rewritten only when they resolve to an existing file
//! inside the root; anything else is left exactly as written.
//!
//! # Example
//!
//! ```no_run
//! use mdv_render::{DocsSite, Routes};
//!
//! let site = DocsSite::new("docs", Routes::new("/admin"));
//! let doc = site.render("guides/setup.md")?;
//! println!("{}", doc.html);
//! # Ok::<(), mdv_render::RenderError>(())
//! ```

mod document;
mod links;
mod listing;
pub mod markdown;
mod path;
mod postprocess;
mod resolver;
mod routes;

pub use document::{DocTarget, DocsSite, RenderError, RenderedDoc};
pub use links::LinkRewriter;
pub use listing::{DocEntry, list_documents};
pub use markdown::TocEntry;
pub use path::normalize_relative;
pub use postprocess::{DiagramPostProcessor, convert_mermaid_blocks};
pub use resolver::LinkResolver;
pub use routes::Routes;
