//! Markdown-level link rewriting.
//!
//! Rewrites references to other markdown files so they point at viewer
//! routes instead of raw filesystem paths. Four textual passes run in order:
//!
//! 1. `{% link path %}` tags become `](path)`
//! 2. Inline links `[text](file.md)`
//! 3. Code spans mentioning a file, `` `file.md` ``
//! 4. Bare mentions of `file.md` in prose
//!
//! Every pass is a best-effort substitution. A reference that does not
//! resolve to an existing file under the document root is left untouched.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::resolver::LinkResolver;

/// Jekyll-style `{% link docs/page.md %}` tag.
static TAG_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{%\s*link\s+([^\s}]+)\s*%\}").unwrap());

/// Inline link `[text](target)`.
static INLINE_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap());

/// Code span whose content ends in `.md`.
static CODE_MENTION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`]+\.md)`").unwrap());

/// Bare `path/file.md` token bounded by whitespace or punctuation.
///
/// The leading class leaves out `[`, `` ` `` and `(` so mentions already
/// wrapped in a link or code span are not matched again.
static BARE_MENTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)(^|[\s\-:])([A-Za-z0-9_\-/]+\.md)([\s.,:;\)\]\n]|$)").unwrap()
});

/// Rewrites markdown file references in document source.
#[derive(Clone, Debug)]
pub struct LinkRewriter {
    resolver: LinkResolver,
}

impl LinkRewriter {
    /// Create a rewriter resolving targets with `resolver`.
    #[must_use]
    pub fn new(resolver: LinkResolver) -> Self {
        Self { resolver }
    }

    /// Run all passes over `text` written in a file located in `base_dir`.
    ///
    /// `base_dir` is relative to the document root (`""` for the root).
    #[must_use]
    pub fn rewrite(&self, text: &str, base_dir: &str) -> String {
        let text = rewrite_tag_links(text);
        let text = self.rewrite_inline_links(&text, base_dir);
        let text = self.rewrite_code_mentions(&text, base_dir);
        self.rewrite_bare_mentions(&text, base_dir)
    }

    fn rewrite_inline_links(&self, text: &str, base_dir: &str) -> String {
        INLINE_LINK_RE
            .replace_all(text, |caps: &Captures| {
                let target = &caps[2];
                if !LinkResolver::is_local_markdown(target) {
                    return caps[0].to_owned();
                }
                match self.resolver.resolve(target, base_dir) {
                    Some(url) => format!("[{}]({url})", &caps[1]),
                    None => caps[0].to_owned(),
                }
            })
            .into_owned()
    }

    fn rewrite_code_mentions(&self, text: &str, base_dir: &str) -> String {
        CODE_MENTION_RE
            .replace_all(text, |caps: &Captures| {
                let mention = &caps[1];
                match self.resolver.resolve(mention, base_dir) {
                    Some(url) => format!("[`{mention}`]({url})"),
                    None => caps[0].to_owned(),
                }
            })
            .into_owned()
    }

    fn rewrite_bare_mentions(&self, text: &str, base_dir: &str) -> String {
        BARE_MENTION_RE
            .replace_all(text, |caps: &Captures| {
                let mention = &caps[2];
                match self.resolver.resolve(mention, base_dir) {
                    Some(url) => format!("{}[{mention}]({url}){}", &caps[1], &caps[3]),
                    None => caps[0].to_owned(),
                }
            })
            .into_owned()
    }
}

/// Replace `{% link path %}` tags with `](path)`, dropping a `docs/` prefix.
///
/// The tag only supplies the tail of a link; the `[text` part is expected to
/// precede it in the source.
fn rewrite_tag_links(text: &str) -> String {
    TAG_LINK_RE
        .replace_all(text, |caps: &Captures| {
            let path = &caps[1];
            format!("]({})", path.strip_prefix("docs/").unwrap_or(path))
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::Routes;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn create_docs() -> tempfile::TempDir {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::create_dir(temp_dir.path().join("guides")).unwrap();
        fs::write(temp_dir.path().join("index.md"), "# Home").unwrap();
        fs::write(temp_dir.path().join("faq.md"), "# FAQ").unwrap();
        fs::write(temp_dir.path().join("guides/index.md"), "# Guides").unwrap();
        fs::write(temp_dir.path().join("guides/setup.md"), "# Setup").unwrap();
        temp_dir
    }

    fn rewriter(docs: &tempfile::TempDir) -> LinkRewriter {
        LinkRewriter::new(LinkResolver::new(docs.path(), Routes::default()))
    }

    #[test]
    fn test_tag_link_strips_docs_prefix() {
        assert_eq!(
            rewrite_tag_links("[Setup{% link docs/guides/setup.md %}"),
            "[Setup](guides/setup.md)"
        );
    }

    #[test]
    fn test_tag_link_without_prefix() {
        assert_eq!(
            rewrite_tag_links("[FAQ{%link faq.md%}"),
            "[FAQ](faq.md)"
        );
    }

    #[test]
    fn test_tag_link_then_inline_pass_resolves() {
        let docs = create_docs();
        assert_eq!(
            rewriter(&docs).rewrite("See [the FAQ{% link docs/faq.md %} now", ""),
            "See [the FAQ](/docs/faq.md) now"
        );
    }

    #[test]
    fn test_inline_link_dot_slash() {
        let docs = create_docs();
        assert_eq!(
            rewriter(&docs).rewrite("[See setup](./setup.md)", "guides"),
            "[See setup](/docs/guides/setup.md)"
        );
    }

    #[test]
    fn test_inline_link_missing_target_unchanged() {
        let docs = create_docs();
        fs::remove_file(docs.path().join("guides/setup.md")).unwrap();

        let text = "[See setup](./setup.md)";
        assert_eq!(rewriter(&docs).rewrite(text, "guides"), text);
    }

    #[test]
    fn test_inline_link_parent() {
        let docs = create_docs();
        assert_eq!(
            rewriter(&docs).rewrite("[Home](../index.md)", "guides"),
            "[Home](/docs/index.md)"
        );
    }

    #[test]
    fn test_inline_link_escaping_root_unchanged() {
        let docs = create_docs();
        let text = "[Secret](../../secret.md)";
        assert_eq!(rewriter(&docs).rewrite(text, "guides"), text);
    }

    #[test]
    fn test_inline_link_external_unchanged() {
        let docs = create_docs();
        let text = "[Spec](https://example.com/faq.md) and [Top](#faq.md)";
        assert_eq!(rewriter(&docs).rewrite(text, ""), text);
    }

    #[test]
    fn test_inline_link_non_markdown_unchanged() {
        let docs = create_docs();
        let text = "[Logo](logo.png)";
        assert_eq!(rewriter(&docs).rewrite(text, ""), text);
    }

    #[test]
    fn test_code_mention() {
        let docs = create_docs();
        assert_eq!(
            rewriter(&docs).rewrite("Read `setup.md` first", "guides"),
            "Read [`setup.md`](/docs/guides/setup.md) first"
        );
    }

    #[test]
    fn test_code_mention_missing_unchanged() {
        let docs = create_docs();
        let text = "Edit `missing.md` later";
        assert_eq!(rewriter(&docs).rewrite(text, ""), text);
    }

    #[test]
    fn test_code_mention_parent_inside_root() {
        let docs = create_docs();
        assert_eq!(
            rewriter(&docs).rewrite("Back to `../faq.md` for answers", "guides"),
            "Back to [`../faq.md`](/docs/faq.md) for answers"
        );
    }

    #[test]
    fn test_code_mention_escaping_root_unchanged() {
        let docs = create_docs();
        let text = "Not `../../faq.md` though";
        assert_eq!(rewriter(&docs).rewrite(text, "guides"), text);
    }

    #[test]
    fn test_bare_mention_from_subdirectory() {
        let docs = create_docs();
        assert_eq!(
            rewriter(&docs).rewrite("see setup.md here", "guides"),
            "see [setup.md](/docs/guides/setup.md) here"
        );
    }

    #[test]
    fn test_bare_mention() {
        let docs = create_docs();
        assert_eq!(
            rewriter(&docs).rewrite("Start with faq.md, then guides/setup.md.", ""),
            "Start with [faq.md](/docs/faq.md), then [guides/setup.md](/docs/guides/setup.md)."
        );
    }

    #[test]
    fn test_bare_mention_at_line_start() {
        let docs = create_docs();
        assert_eq!(
            rewriter(&docs).rewrite("faq.md\nnext line", ""),
            "[faq.md](/docs/faq.md)\nnext line"
        );
    }

    #[test]
    fn test_bare_mention_missing_unchanged() {
        let docs = create_docs();
        let text = "See CHANGELOG.md for history.";
        assert_eq!(rewriter(&docs).rewrite(text, ""), text);
    }

    #[test]
    fn test_already_linked_mention_not_relinked() {
        let docs = create_docs();
        assert_eq!(
            rewriter(&docs).rewrite("[faq.md](faq.md)", ""),
            "[faq.md](/docs/faq.md)"
        );
    }

    #[test]
    fn test_rewrite_is_stable_for_unchanged_source() {
        let docs = create_docs();
        let rewriter = rewriter(&docs);
        let text = "# Title\n\nSee [setup](setup.md), `index.md` and faq.md.\n";

        assert_eq!(
            rewriter.rewrite(text, "guides"),
            rewriter.rewrite(text, "guides")
        );
    }
}
