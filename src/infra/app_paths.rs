//! Usage: Resolve the app base directory, the bundled entry page URL, and per-user store paths.

use std::path::{Path, PathBuf};
use tauri::Manager;
use url::Url;

const ENTRY_PAGE_SEGMENTS: [&str; 2] = ["build", "index.html"];
const WINDOW_STATE_FILE: &str = "window-state.json";
const SETTINGS_FILE: &str = "settings.json";

/// Debug builds serve the page from the crate checkout; packaged builds from the resource dir.
pub fn base_dir(app: &tauri::AppHandle) -> Result<PathBuf, String> {
    if cfg!(debug_assertions) {
        return Ok(PathBuf::from(env!("CARGO_MANIFEST_DIR")));
    }
    app.path()
        .resource_dir()
        .map_err(|e| format!("failed to resolve resource dir: {e}"))
}

pub fn entry_page_path(base: &Path) -> PathBuf {
    ENTRY_PAGE_SEGMENTS
        .iter()
        .fold(base.to_path_buf(), |path, segment| path.join(segment))
}

pub fn entry_url(base: &Path) -> Result<Url, String> {
    let path = entry_page_path(base);
    Url::from_file_path(&path)
        .map_err(|_| format!("entry page path is not absolute: {}", path.display()))
}

fn config_dir(app: &tauri::AppHandle) -> Result<PathBuf, String> {
    let dir = app
        .path()
        .app_config_dir()
        .map_err(|e| format!("failed to resolve app config dir: {e}"))?;
    std::fs::create_dir_all(&dir).map_err(|e| format!("failed to create app config dir: {e}"))?;
    Ok(dir)
}

pub fn window_state_path(app: &tauri::AppHandle) -> Result<PathBuf, String> {
    Ok(config_dir(app)?.join(WINDOW_STATE_FILE))
}

pub fn settings_path(app: &tauri::AppHandle) -> Result<PathBuf, String> {
    Ok(config_dir(app)?.join(SETTINGS_FILE))
}

pub fn log_dir(app: &tauri::AppHandle) -> Result<PathBuf, String> {
    let dir = app
        .path()
        .app_log_dir()
        .map_err(|e| format!("failed to resolve app log dir: {e}"))?;
    std::fs::create_dir_all(&dir).map_err(|e| format!("failed to create app log dir: {e}"))?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_page_path_appends_build_index() {
        let base = Path::new("base");
        assert_eq!(
            entry_page_path(base),
            Path::new("base").join("build").join("index.html")
        );
    }

    #[cfg(unix)]
    #[test]
    fn entry_url_is_a_file_url() {
        let url = entry_url(Path::new("/opt/jitsi-meet")).expect("entry url");
        assert_eq!(url.scheme(), "file");
        assert_eq!(url.as_str(), "file:///opt/jitsi-meet/build/index.html");
    }

    #[cfg(unix)]
    #[test]
    fn entry_url_percent_encodes_spaces() {
        let url = entry_url(Path::new("/Applications/Jitsi Meet.app/Contents/Resources"))
            .expect("entry url");
        assert_eq!(
            url.as_str(),
            "file:///Applications/Jitsi%20Meet.app/Contents/Resources/build/index.html"
        );
    }

    #[test]
    fn entry_url_rejects_relative_base() {
        let err = entry_url(Path::new("relative")).unwrap_err();
        assert!(err.starts_with("entry page path is not absolute"));
    }
}
