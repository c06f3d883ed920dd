//! Document pipeline: path check, read, rewrite, convert, post-process.

use std::fs;
use std::path::{Path, PathBuf};

use crate::links::LinkRewriter;
use crate::listing::{DocEntry, list_documents};
use crate::markdown::{TocEntry, to_html};
use crate::path::{is_markdown, normalize_relative, parent_dir};
use crate::postprocess::DiagramPostProcessor;
use crate::resolver::LinkResolver;
use crate::routes::Routes;

/// Error returned when a document cannot be served.
///
/// Callers answer every variant with "not found"; the variants only exist
/// for logging.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Path escapes the document root or is absolute.
    #[error("Path outside document root: {0}")]
    OutsideRoot(String),
    /// No such file under the document root.
    #[error("Document not found: {0}")]
    NotFound(String),
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

/// A rendered markdown document.
#[derive(Clone, Debug)]
pub struct RenderedDoc {
    /// Normalized path relative to the document root.
    pub path: String,
    /// Title from the first H1 heading.
    pub title: Option<String>,
    /// Table of contents entries.
    pub toc: Vec<TocEntry>,
    /// Rendered HTML body.
    pub html: String,
}

/// What a request path under the document root refers to.
#[derive(Debug)]
pub enum DocTarget {
    /// Markdown document, rendered to HTML.
    Page(RenderedDoc),
    /// Any other file, served as-is.
    Asset(PathBuf),
}

/// Markdown documentation rooted at a directory.
///
/// Holds the configuration shared by the rewriting components; there is no
/// other state, so a single instance can serve concurrent requests.
#[derive(Clone, Debug)]
pub struct DocsSite {
    resolver: LinkResolver,
    rewriter: LinkRewriter,
    postprocessor: DiagramPostProcessor,
}

impl DocsSite {
    /// Create a site for documents under `root`, linked through `routes`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, routes: Routes) -> Self {
        let resolver = LinkResolver::new(root, routes);
        Self {
            rewriter: LinkRewriter::new(resolver.clone()),
            postprocessor: DiagramPostProcessor::new(resolver.clone()),
            resolver,
        }
    }

    /// Document root.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.resolver.root()
    }

    /// Route generator.
    #[must_use]
    pub fn routes(&self) -> &Routes {
        self.resolver.routes()
    }

    /// List markdown files at the top of the document root.
    pub fn list(&self) -> Vec<DocEntry> {
        list_documents(self.root(), self.routes())
    }

    /// Resolve a request path to a rendered page or a static asset.
    pub fn open(&self, path: &str) -> Result<DocTarget, RenderError> {
        let normalized = normalize_relative(path)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| RenderError::OutsideRoot(path.to_owned()))?;

        if !is_markdown(&normalized) {
            let full_path = self.root().join(&normalized);
            if !full_path.is_file() {
                return Err(RenderError::NotFound(normalized));
            }
            return Ok(DocTarget::Asset(full_path));
        }

        self.render(&normalized).map(DocTarget::Page)
    }

    /// Render a markdown document given its normalized path.
    pub fn render(&self, path: &str) -> Result<RenderedDoc, RenderError> {
        let full_path = self.root().join(path);
        if !full_path.is_file() {
            return Err(RenderError::NotFound(path.to_owned()));
        }
        let source = fs::read_to_string(&full_path).map_err(|source| RenderError::Read {
            path: full_path,
            source,
        })?;

        Ok(self.render_source(path, &source))
    }

    /// Run the rendering pipeline over document source.
    ///
    /// `path` locates the document so relative links resolve against its
    /// directory.
    #[must_use]
    pub fn render_source(&self, path: &str, source: &str) -> RenderedDoc {
        let base_dir = parent_dir(path);
        let markdown = self.rewriter.rewrite(source, base_dir);
        let converted = to_html(&markdown);
        let html = self.postprocessor.postprocess(&converted.html, base_dir);

        RenderedDoc {
            path: path.to_owned(),
            title: converted.title,
            toc: converted.toc,
            html,
        }
    }
}
