//! Relative path handling below a documentation root.

use std::path::Path;

/// Normalize a relative path, rejecting anything that leaves the root.
///
/// `.` segments and empty segments are dropped and `..` removes the previous
/// segment. Both `/` and `\` separate segments. Returns `None` for absolute
/// paths, drive-prefixed paths and paths that climb above the root.
/// The root itself normalizes to an empty string.
///
/// # Examples
///
/// ```
/// use mdv_render::normalize_relative;
///
/// assert_eq!(normalize_relative("guides/./setup.md").as_deref(), Some("guides/setup.md"));
/// assert_eq!(normalize_relative("guides/../index.md").as_deref(), Some("index.md"));
/// assert_eq!(normalize_relative("../../etc/passwd"), None);
/// assert_eq!(normalize_relative("/etc/passwd"), None);
/// ```
pub fn normalize_relative(path: &str) -> Option<String> {
    if path.starts_with(['/', '\\']) || has_drive_prefix(path) || Path::new(path).has_root() {
        return None;
    }

    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            name => segments.push(name),
        }
    }

    Some(segments.join("/"))
}

/// Directory part of a normalized relative path (`""` at the root).
pub(crate) fn parent_dir(path: &str) -> &str {
    path.rsplit_once('/').map_or("", |(dir, _)| dir)
}

/// Whether the path ends with the markdown suffix (ASCII case-insensitive).
pub(crate) fn is_markdown(path: &str) -> bool {
    path.len() >= 3
        && path.is_char_boundary(path.len() - 3)
        && path[path.len() - 3..].eq_ignore_ascii_case(".md")
}

fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}
