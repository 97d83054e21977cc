//! File path helpers

use std::path::PathBuf;

/// Replace a leading `~` with the home directory.
///
/// Other paths, including `~user` forms, are returned as given. Relative paths
/// stay relative and resolve against the working directory when opened.
pub fn expand_home(path: &str) -> PathBuf {
    let rest = match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => return PathBuf::from(path),
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest.trim_start_matches('/')),
        None => PathBuf::from(path),
    }
}
