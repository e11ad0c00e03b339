//! Usage: Desktop settings Tauri commands.

use crate::app::app_state::SettingsState;
use crate::settings::{self, DesktopSettings};

#[tauri::command]
pub(crate) fn settings_get(state: tauri::State<'_, SettingsState>) -> DesktopSettings {
    state.snapshot()
}

#[tauri::command]
pub(crate) fn settings_set(
    app: tauri::AppHandle,
    state: tauri::State<'_, SettingsState>,
    auto_update_check: bool,
    always_on_top_window_enabled: bool,
) -> Result<DesktopSettings, String> {
    let next = DesktopSettings {
        auto_update_check,
        always_on_top_window_enabled,
        ..state.snapshot()
    };
    let saved = settings::write(&app, &next)?;
    state.replace(saved.clone());
    tracing::info!(
        auto_update_check = saved.auto_update_check,
        always_on_top_window_enabled = saved.always_on_top_window_enabled,
        "settings updated"
    );
    Ok(saved)
}
