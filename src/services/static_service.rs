use std::path::{Component, Path, PathBuf};

use mime::Mime;

/// Map a request path onto the static file tree under `base_dir`.
///
/// Returns `None` for any path that would escape the root: only
/// plain (`Normal`) components are accepted, so `..`, absolute paths
/// and drive prefixes are all rejected before the filesystem is
/// touched. Callers treat `None` like a missing file (404).
pub fn resolve(base_dir: &str, request_path: &str) -> Option<PathBuf> {
    let relative = request_path.strip_prefix('/').unwrap_or(request_path);
    let relative = Path::new(relative);

    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        return None;
    }

    Some(Path::new(base_dir).join(relative))
}

/// Content type from the file extension, `text/plain` when the
/// extension is unknown.
pub fn content_type(path: &Path) -> Mime {
    mime_guess::from_path(path).first_or(mime::TEXT_PLAIN)
}
