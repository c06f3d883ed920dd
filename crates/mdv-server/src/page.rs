//! HTML shell around rendered documents.

use std::fmt::Write;

use html_escape::{encode_double_quoted_attribute, encode_text};
use mdv_render::{RenderedDoc, Routes};

/// Wrap a rendered document in a standalone HTML5 page.
///
/// The page links back to the document index, lists the document's
/// sub-headings and loads `mermaid_script` so diagram blocks are drawn in
/// the browser.
pub(crate) fn render_page(doc: &RenderedDoc, routes: &Routes, mermaid_script: &str) -> String {
    let title = doc.title.as_deref().unwrap_or(&doc.path);
    let mut out = String::with_capacity(doc.html.len() + 1024);

    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str(
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n",
    );
    let _ = writeln!(out, "<title>{}</title>", encode_text(title));
    out.push_str("</head>\n<body>\n");
    let _ = writeln!(
        out,
        r#"<nav class="docs-nav"><a href="{}">Documentation</a></nav>"#,
        encode_double_quoted_attribute(&routes.docs_index())
    );

    let sections: Vec<_> = doc.toc.iter().filter(|entry| entry.level > 1).collect();
    if !sections.is_empty() {
        out.push_str("<aside class=\"docs-toc\">\n<ul>\n");
        for entry in sections {
            let _ = writeln!(
                out,
                r##"<li class="toc-level-{}"><a href="#{}">{}</a></li>"##,
                entry.level,
                encode_double_quoted_attribute(&entry.id),
                encode_text(&entry.title)
            );
        }
        out.push_str("</ul>\n</aside>\n");
    }

    out.push_str("<main class=\"docs-content\">\n");
    out.push_str(&doc.html);
    out.push_str("</main>\n");
    let _ = writeln!(
        out,
        r#"<script src="{}"></script>"#,
        encode_double_quoted_attribute(mermaid_script)
    );
    out.push_str("<script>mermaid.initialize({ startOnLoad: true });</script>\n");
    out.push_str("</body>\n</html>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdv_render::TocEntry;

    fn doc(title: Option<&str>, toc: Vec<TocEntry>) -> RenderedDoc {
        RenderedDoc {
            path: "guides/setup.md".to_owned(),
            title: title.map(str::to_owned),
            toc,
            html: "<h1 id=\"setup\">Setup</h1>\n".to_owned(),
        }
    }

    fn entry(level: u8, title: &str, id: &str) -> TocEntry {
        TocEntry {
            level,
            title: title.to_owned(),
            id: id.to_owned(),
        }
    }

    #[test]
    fn test_page_contains_content_and_script() {
        let page = render_page(&doc(Some("Setup"), vec![]), &Routes::new("/admin"), "/mermaid.js");

        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>Setup</title>"));
        assert!(page.contains(r#"<a href="/admin/docs/">Documentation</a>"#));
        assert!(page.contains("<h1 id=\"setup\">Setup</h1>"));
        assert!(page.contains(r#"<script src="/mermaid.js"></script>"#));
        assert!(!page.contains("docs-toc"));
    }

    #[test]
    fn test_page_title_falls_back_to_path() {
        let page = render_page(&doc(None, vec![]), &Routes::default(), "/m.js");

        assert!(page.contains("<title>guides/setup.md</title>"));
    }

    #[test]
    fn test_page_toc_lists_sub_headings_escaped() {
        let toc = vec![
            entry(1, "Setup", "setup"),
            entry(2, "Install <fast>", "install-fast"),
            entry(3, "Linux", "linux"),
        ];

        let page = render_page(&doc(Some("Setup & Go"), toc), &Routes::default(), "/m.js");

        assert!(page.contains("<title>Setup &amp; Go</title>"));
        assert!(page.contains(
            r##"<li class="toc-level-2"><a href="#install-fast">Install &lt;fast&gt;</a></li>"##
        ));
        assert!(page.contains(r##"<li class="toc-level-3"><a href="#linux">Linux</a></li>"##));
        assert!(!page.contains(r##"href="#setup""##));
    }
}
