//! HTML-level post-processing of rendered documents.
//!
//! Runs after markdown conversion:
//! - Mermaid code blocks become `<div class="mermaid">` containers that the
//!   client-side renderer picks up.
//! - Anchors still pointing at markdown files (raw HTML passes through the
//!   converter verbatim) get their `href` rewritten to viewer routes.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::resolver::LinkResolver;

/// Fenced mermaid block as emitted by the converter (either class spelling).
static MERMAID_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<pre><code class="(?:language-)?mermaid">(.*?)</code></pre>"#).unwrap()
});

/// Opening anchor tag with an `href` attribute.
///
/// Groups: attributes before `href`, whitespace before `href`, opening quote,
/// target, closing quote, attributes after the target.
static ANCHOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<a([^>]*?)(\s+)href=(["'])([^"']+)(["'])([^>]*)>"#).unwrap()
});

/// Rewrites rendered HTML for diagrams and leftover markdown links.
#[derive(Clone, Debug)]
pub struct DiagramPostProcessor {
    resolver: LinkResolver,
}

impl DiagramPostProcessor {
    /// Create a post-processor resolving targets with `resolver`.
    #[must_use]
    pub fn new(resolver: LinkResolver) -> Self {
        Self { resolver }
    }

    /// Run the mermaid and anchor passes over `html` rendered from a file in `base_dir`.
    #[must_use]
    pub fn postprocess(&self, html: &str, base_dir: &str) -> String {
        let html = convert_mermaid_blocks(html);
        self.rewrite_anchors(&html, base_dir)
    }

    fn rewrite_anchors(&self, html: &str, base_dir: &str) -> String {
        ANCHOR_RE
            .replace_all(html, |caps: &Captures| {
                let target = &caps[4];
                if !LinkResolver::is_local_markdown(target) {
                    return caps[0].to_owned();
                }
                match self.resolver.resolve(target, base_dir) {
                    Some(url) => format!(
                        "<a{}{}href={}{url}{}{}>",
                        &caps[1], &caps[2], &caps[3], &caps[5], &caps[6]
                    ),
                    None => caps[0].to_owned(),
                }
            })
            .into_owned()
    }
}

/// Replace mermaid code blocks with diagram containers.
///
/// The block content is HTML-unescaped and trimmed so the client receives
/// the raw diagram source.
///
/// ```
/// use mdv_render::convert_mermaid_blocks;
///
/// let html = "<pre><code class=\"language-mermaid\">graph TD; A--&gt;B;\n</code></pre>";
/// assert_eq!(
///     convert_mermaid_blocks(html),
///     "<div class=\"mermaid\">graph TD; A-->B;</div>"
/// );
/// ```
#[must_use]
pub fn convert_mermaid_blocks(html: &str) -> String {
    MERMAID_BLOCK_RE
        .replace_all(html, |caps: &Captures| {
            let source = html_escape::decode_html_entities(&caps[1]);
            format!(r#"<div class="mermaid">{}</div>"#, source.trim())
        })
        .into_owned()
}
