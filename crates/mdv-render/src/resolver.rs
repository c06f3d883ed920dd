//! Link target classification and resolution against the document root.

use std::path::{Path, PathBuf};

use crate::path::{is_markdown, normalize_relative};
use crate::routes::Routes;

/// Resolves link targets found in documents to viewer routes.
///
/// A target is rewritten only when it is a relative markdown path that stays
/// inside the document root and names an existing file. Everything else
/// resolves to `None` and is left as written.
#[derive(Clone, Debug)]
pub struct LinkResolver {
    root: PathBuf,
    routes: Routes,
}

impl LinkResolver {
    /// Create a resolver for documents under `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, routes: Routes) -> Self {
        Self {
            root: root.into(),
            routes,
        }
    }

    /// Document root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Route generator.
    #[must_use]
    pub fn routes(&self) -> &Routes {
        &self.routes
    }

    /// Whether a link target points at a local markdown file.
    ///
    /// Targets with a URL scheme and pure fragments are external.
    #[must_use]
    pub fn is_local_markdown(target: &str) -> bool {
        !has_scheme(target) && !target.starts_with('#') && is_markdown(target)
    }

    /// Resolve a link target written in a file located in `base_dir`.
    ///
    /// Returns the route URL when the target resolves to an existing file
    /// under the root, `None` otherwise.
    #[must_use]
    pub fn resolve(&self, target: &str, base_dir: &str) -> Option<String> {
        let path = self.resolve_path(target, base_dir)?;
        Some(self.routes.doc(&path))
    }

    /// Resolve a link target to a normalized path relative to the root.
    #[must_use]
    pub fn resolve_path(&self, target: &str, base_dir: &str) -> Option<String> {
        let target = target.strip_prefix("./").unwrap_or(target);
        if target.starts_with(['/', '\\']) {
            return None;
        }

        let joined = if base_dir.is_empty() {
            target.to_owned()
        } else {
            format!("{base_dir}/{target}")
        };

        let Some(normalized) = normalize_relative(&joined).filter(|p| !p.is_empty()) else {
            tracing::debug!(link = target, base_dir, "Link target escapes document root");
            return None;
        };

        self.root.join(&normalized).is_file().then_some(normalized)
    }
}

/// Whether the target starts with a URL scheme (`http:`, `mailto:`, ...).
fn has_scheme(target: &str) -> bool {
    let Some((scheme, _)) = target.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
