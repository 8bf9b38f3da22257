use std::path::{Path, PathBuf};

/// Per-project settings, checked into the project repository.
pub const PROJECT_CONFIG_FILE: &str = "zowe-api.json";

/// Per-developer settings, kept next to the project config but not shared.
pub const USER_CONFIG_FILE: &str = "user-zowe-api.json";

/// Project config file path
pub fn project_config(project_dir: &Path) -> PathBuf {
    project_dir.join(PROJECT_CONFIG_FILE)
}

/// User config file path
pub fn user_config(project_dir: &Path) -> PathBuf {
    project_dir.join(USER_CONFIG_FILE)
}

/// Resolve a configured local path against an optional project root.
///
/// Absolute paths and paths without a root are returned verbatim so that
/// the names handed to the transfer utility match the configuration.
pub fn resolve_local(root: Option<&Path>, path: &str) -> String {
    match root {
        Some(root) if !Path::new(path).is_absolute() => {
            root.join(path).to_string_lossy().to_string()
        }
        _ => path.to_string(),
    }
}

/// Project root used for local path resolution, `None` for the current directory.
pub fn local_root(project_dir: &Path) -> Option<&Path> {
    if project_dir.as_os_str().is_empty() || project_dir == Path::new(".") {
        None
    } else {
        Some(project_dir)
    }
}
