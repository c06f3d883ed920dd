//! Markdown to HTML5 conversion.
//!
//! Wraps pulldown-cmark with tables, strikethrough and heading attributes
//! enabled. Every heading receives an `id` so the table of contents can link
//! to it; explicit `{#id}` attributes take precedence over generated slugs.

use std::collections::HashSet;

use pulldown_cmark::{CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd, html};

/// Table of contents entry.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TocEntry {
    /// Heading level (1-6).
    pub level: u8,
    /// Heading text.
    pub title: String,
    /// Anchor ID.
    pub id: String,
}

/// Result of converting a markdown document.
#[derive(Clone, Debug)]
pub struct Converted {
    /// Rendered HTML.
    pub html: String,
    /// Text of the first H1 heading.
    pub title: Option<String>,
    /// Headings in document order.
    pub toc: Vec<TocEntry>,
}

/// Parser options used for documents.
fn parser_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_HEADING_ATTRIBUTES
}

/// Convert markdown to HTML, collecting the title and heading anchors.
pub fn to_html(markdown: &str) -> Converted {
    let mut events: Vec<Event<'_>> = Vec::new();
    let mut toc = Vec::new();
    let mut title = None;
    let mut used_ids = HashSet::new();
    // Index of the open heading's start event and its text so far.
    let mut heading: Option<(usize, String)> = None;

    for event in Parser::new_ext(markdown, parser_options()) {
        if let (Some((_, text)), Event::Text(t) | Event::Code(t)) = (heading.as_mut(), &event) {
            text.push_str(t);
        }

        match event {
            Event::Start(Tag::Heading { .. }) => {
                heading = Some((events.len(), String::new()));
                events.push(event);
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((start, text)) = heading.take()
                    && let Event::Start(Tag::Heading { level, id, .. }) = &mut events[start]
                {
                    let text = text.trim().to_owned();
                    let anchor = match id {
                        Some(explicit) => {
                            used_ids.insert(explicit.to_string());
                            explicit.to_string()
                        }
                        None => unique_id(&slugify(&text), &mut used_ids),
                    };
                    *id = Some(CowStr::from(anchor.clone()));

                    if *level == HeadingLevel::H1 && title.is_none() {
                        title = Some(text.clone());
                    }
                    toc.push(TocEntry {
                        level: heading_level_to_num(*level),
                        title: text,
                        id: anchor,
                    });
                }
                events.push(event);
            }
            other => events.push(other),
        }
    }

    let mut output = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut output, events.into_iter());

    Converted {
        html: output,
        title,
        toc,
    }
}

/// Convert heading text to an anchor slug.
pub(crate) fn slugify(text: &str) -> String {
    let mut result = String::new();
    let mut last_was_dash = true; // Prevents leading dash

    for c in text.trim().chars() {
        if c.is_alphanumeric() {
            result.extend(c.to_lowercase());
            last_was_dash = false;
        } else if !last_was_dash && (c.is_whitespace() || c == '-' || c == '_') {
            result.push('-');
            last_was_dash = true;
        }
    }

    if result.ends_with('-') {
        result.pop();
    }

    result
}

/// Make `base` unique among `used` by appending `_1`, `_2`, ...
fn unique_id(base: &str, used: &mut HashSet<String>) -> String {
    let base = if base.is_empty() { "section" } else { base };
    let mut candidate = base.to_owned();
    let mut n = 1;
    while used.contains(&candidate) {
        candidate = format!("{base}_{n}");
        n += 1;
    }
    used.insert(candidate.clone());
    candidate
}

fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("What's New?"), "whats-new");
        assert_eq!(slugify("  Spaces  "), "spaces");
        assert_eq!(slugify("snake_case name"), "snake-case-name");
        assert_eq!(slugify("Установка"), "установка");
    }

    #[test]
    fn test_headings_get_ids_and_toc() {
        let result = to_html("# Guide\n\n## Install `mdv`\n\n## Usage\n");

        assert_eq!(result.title.as_deref(), Some("Guide"));
        assert!(result.html.contains(r#"<h1 id="guide">Guide</h1>"#));
        assert!(result.html.contains(r#"<h2 id="install-mdv">Install <code>mdv</code></h2>"#));
        assert_eq!(
            result.toc,
            vec![
                TocEntry {
                    level: 1,
                    title: "Guide".to_owned(),
                    id: "guide".to_owned()
                },
                TocEntry {
                    level: 2,
                    title: "Install mdv".to_owned(),
                    id: "install-mdv".to_owned()
                },
                TocEntry {
                    level: 2,
                    title: "Usage".to_owned(),
                    id: "usage".to_owned()
                },
            ]
        );
    }

    #[test]
    fn test_duplicate_headings_get_suffixes() {
        let result = to_html("## Notes\n\n## Notes\n\n## Notes\n");
        let ids: Vec<_> = result.toc.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["notes", "notes_1", "notes_2"]);
    }

    #[test]
    fn test_explicit_heading_id_wins() {
        let result = to_html("## Setup {#install}\n");
        assert!(result.html.contains(r#"<h2 id="install">Setup</h2>"#));
        assert_eq!(result.toc[0].id, "install");
    }

    #[test]
    fn test_no_h1_means_no_title() {
        let result = to_html("## Only a section\n");
        assert!(result.title.is_none());
    }

    #[test]
    fn test_fenced_code_language_class() {
        let result = to_html("```mermaid\ngraph TD; A-->B;\n```\n");
        assert_eq!(
            result.html,
            "<pre><code class=\"language-mermaid\">graph TD; A--&gt;B;\n</code></pre>\n"
        );
    }

    #[test]
    fn test_tables_enabled() {
        let result = to_html("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(result.html.contains("<table>"));
        assert!(result.html.contains("<td>1</td>"));
    }

    #[test]
    fn test_raw_html_passes_through() {
        let result = to_html("<a href=\"setup.md\">Setup</a>\n");
        assert!(result.html.contains(r#"<a href="setup.md">Setup</a>"#));
    }
}
