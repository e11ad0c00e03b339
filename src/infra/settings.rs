//! Usage: Persisted desktop settings (schema + read/write helpers).

use crate::app_paths;
use crate::shared::fs::{read_optional_file, write_file_atomic};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const SCHEMA_VERSION: u32 = 1;
const DEFAULT_AUTO_UPDATE_CHECK: bool = true;
const DEFAULT_ALWAYS_ON_TOP_WINDOW_ENABLED: bool = true;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesktopSettings {
    pub schema_version: u32,
    pub auto_update_check: bool,
    pub always_on_top_window_enabled: bool,
}

impl Default for DesktopSettings {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            auto_update_check: DEFAULT_AUTO_UPDATE_CHECK,
            always_on_top_window_enabled: DEFAULT_ALWAYS_ON_TOP_WINDOW_ENABLED,
        }
    }
}

/// Returns the parsed settings and whether they should be written back (schema bump).
fn parse(bytes: &[u8]) -> Result<(DesktopSettings, bool), String> {
    let value: serde_json::Value =
        serde_json::from_slice(bytes).map_err(|e| format!("failed to parse settings: {e}"))?;
    // `#[serde(default)]` would fill a missing schema_version, so check the raw document.
    let stored_version = value.get("schema_version").and_then(|v| v.as_u64());
    let mut settings: DesktopSettings =
        serde_json::from_value(value).map_err(|e| format!("failed to parse settings: {e}"))?;

    let changed = stored_version != Some(u64::from(SCHEMA_VERSION));
    settings.schema_version = SCHEMA_VERSION;
    Ok((settings, changed))
}

pub(crate) fn read_from(path: &Path) -> Result<DesktopSettings, String> {
    let Some(bytes) = read_optional_file(path)? else {
        return Ok(DesktopSettings::default());
    };
    let (settings, changed) = parse(&bytes)?;
    if changed {
        write_to(path, &settings)?;
    }
    Ok(settings)
}

pub(crate) fn write_to(path: &Path, settings: &DesktopSettings) -> Result<(), String> {
    let mut settings = settings.clone();
    settings.schema_version = SCHEMA_VERSION;
    let bytes = serde_json::to_vec_pretty(&settings)
        .map_err(|e| format!("failed to serialize settings: {e}"))?;
    write_file_atomic(path, &bytes)
}

pub fn read(app: &tauri::AppHandle) -> Result<DesktopSettings, String> {
    read_from(&app_paths::settings_path(app)?)
}

/// Like [`read`], but falls back to defaults (logged) so callers on the startup path never fail.
pub fn read_or_default(app: &tauri::AppHandle) -> DesktopSettings {
    match read(app) {
        Ok(settings) => settings,
        Err(err) => {
            tracing::warn!("settings unreadable, using defaults: {}", err);
            DesktopSettings::default()
        }
    }
}

pub fn write(app: &tauri::AppHandle, settings: &DesktopSettings) -> Result<DesktopSettings, String> {
    let path = app_paths::settings_path(app)?;
    write_to(&path, settings)?;
    read_from(&path)
}
