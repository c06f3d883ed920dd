//! Discovery of extension modules to document.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Directory names that never hold extension modules.
const IGNORED_DIRS: &[&str] = &["venv", "env"];

/// Find extension module directories under `modules_dir`.
///
/// A directory counts when it contains `marker_file` and its name does not
/// start with `.` or `__`. Names are sorted case-insensitively; a missing
/// directory yields nothing.
pub(crate) fn discover_modules(modules_dir: &Path, marker_file: &str) -> Vec<String> {
    let Ok(entries) = fs::read_dir(modules_dir) else {
        return Vec::new();
    };

    let mut names: Vec<String> = entries
        .flatten()
        .filter_map(|entry| entry.file_name().into_string().ok().map(|n| (n, entry.path())))
        .filter(|(name, path)| {
            !name.starts_with('.')
                && !name.starts_with("__")
                && !IGNORED_DIRS.contains(&name.as_str())
                && path.is_dir()
                && path.join(marker_file).is_file()
        })
        .map(|(name, _)| name)
        .collect();

    names.sort_by_cached_key(|name| name.to_lowercase());
    names
}

/// Keep discovered modules that are active, preserving discovery order.
///
/// `None` means the registry is unavailable and everything is kept.
pub(crate) fn select_active(discovered: Vec<String>, active: Option<&[String]>) -> Vec<String> {
    let Some(active) = active else {
        return discovered;
    };
    let active: HashSet<&str> = active.iter().map(String::as_str).collect();
    discovered
        .into_iter()
        .filter(|name| active.contains(name.as_str()))
        .collect()
}
