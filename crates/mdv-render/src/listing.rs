//! Listing of documents at the top of the document root.

use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::path::is_markdown;
use crate::routes::Routes;

/// Number of leading lines searched for a title heading.
const TITLE_SCAN_LINES: usize = 5;

/// A markdown file available in the document root.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DocEntry {
    /// File name, e.g. `getting_started.md`.
    pub filename: String,
    /// Display title.
    pub title: String,
    /// Viewer URL of the document.
    pub url: String,
}

/// List markdown files directly inside `root`, sorted case-insensitively.
///
/// Sub-directories are not descended into. A missing root lists nothing.
pub fn list_documents(root: &Path, routes: &Routes) -> Vec<DocEntry> {
    let Ok(entries) = fs::read_dir(root) else {
        return Vec::new();
    };

    let mut docs: Vec<DocEntry> = entries
        .flatten()
        .filter_map(|entry| {
            let filename = entry.file_name().into_string().ok()?;
            let path = entry.path();
            if !is_markdown(&filename) || !path.is_file() {
                return None;
            }
            let title = read_title(&path).unwrap_or_else(|| fallback_title(&filename));
            Some(DocEntry {
                url: routes.doc(&filename),
                title,
                filename,
            })
        })
        .collect();

    docs.sort_by_cached_key(|doc| doc.filename.to_lowercase());
    docs
}

/// Title from a `# ` or `## ` heading among the first lines of the file.
fn read_title(path: &Path) -> Option<String> {
    let file = fs::File::open(path).ok()?;
    BufReader::new(file)
        .lines()
        .take(TITLE_SCAN_LINES)
        .map_while(Result::ok)
        .find_map(|line| heading_title(&line))
}

fn heading_title(line: &str) -> Option<String> {
    line.strip_prefix("# ")
        .or_else(|| line.strip_prefix("## "))
        .map(|title| title.trim().to_owned())
}

/// File stem with underscores turned into spaces.
fn fallback_title(filename: &str) -> String {
    filename[..filename.len() - 3].replace('_', " ")
}
