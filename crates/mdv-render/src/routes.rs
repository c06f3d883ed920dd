//! URL generation for viewer routes.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

/// Characters escaped inside a route path (`/` is kept as the separator).
const PATH: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'(')
    .add(b')')
    .add(b'[')
    .add(b']');

/// Maps documents and generated files to URLs under a mount prefix.
///
/// The prefix is where the viewer is mounted in the hosting application
/// (`""` for the root, otherwise `/name` without trailing slash).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Routes {
    base_path: String,
}

impl Routes {
    /// Create routes mounted under `base_path`.
    #[must_use]
    pub fn new(base_path: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// URL of a document (or asset) below the document root.
    ///
    /// ```
    /// use mdv_render::Routes;
    ///
    /// let routes = Routes::new("/admin");
    /// assert_eq!(routes.doc("guides/setup.md"), "/admin/docs/guides/setup.md");
    /// assert_eq!(routes.doc("my notes.md"), "/admin/docs/my%20notes.md");
    /// ```
    #[must_use]
    pub fn doc(&self, path: &str) -> String {
        format!("{}/docs/{}", self.base_path, utf8_percent_encode(path, PATH))
    }

    /// URL of the documentation index.
    #[must_use]
    pub fn docs_index(&self) -> String {
        format!("{}/docs/", self.base_path)
    }

    /// URL of the document listing.
    #[must_use]
    pub fn docs_list(&self) -> String {
        format!("{}/docs/list", self.base_path)
    }

    /// URL of a file in the generated documentation tree.
    #[must_use]
    pub fn generated(&self, path: &str) -> String {
        format!(
            "{}/docs_dev/{}",
            self.base_path,
            utf8_percent_encode(path, PATH)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doc_at_root_mount() {
        let routes = Routes::default();
        assert_eq!(routes.doc("index.md"), "/docs/index.md");
        assert_eq!(routes.docs_index(), "/docs/");
        assert_eq!(routes.docs_list(), "/docs/list");
    }

    #[test]
    fn test_doc_keeps_separators_and_case() {
        let routes = Routes::new("/plugins");
        assert_eq!(
            routes.doc("Guides/Setup_Notes.md"),
            "/plugins/docs/Guides/Setup_Notes.md"
        );
    }

    #[test]
    fn test_doc_escapes_link_breaking_characters() {
        let routes = Routes::default();
        assert_eq!(routes.doc("a (b).md"), "/docs/a%20%28b%29.md");
    }

    #[test]
    fn test_generated() {
        let routes = Routes::new("/x");
        assert_eq!(routes.generated("app/index.html"), "/x/docs_dev/app/index.html");
    }
}
