//! Usage: Window-scoped Tauri commands used by the loaded content (popups, always-on-top).

use crate::app::{always_on_top, popups};
use crate::domain::popups::PopupsConfigInput;

#[tauri::command]
pub(crate) fn popups_configure(
    app: tauri::AppHandle,
    webview_window: tauri::WebviewWindow,
    config: PopupsConfigInput,
) -> Result<Vec<String>, String> {
    popups::configure(&app, webview_window.label(), &config)
}

#[tauri::command]
pub(crate) fn popup_open(
    app: tauri::AppHandle,
    webview_window: tauri::WebviewWindow,
    url: String,
    frame_name: Option<String>,
) -> Result<popups::PopupOpenOutcome, String> {
    popups::open_popup(&app, webview_window.label(), &url, frame_name.as_deref())
}

#[tauri::command]
pub(crate) fn always_on_top_set(
    webview_window: tauri::WebviewWindow,
    enabled: bool,
) -> Result<bool, String> {
    always_on_top::set(&webview_window, enabled)
}

#[tauri::command]
pub(crate) fn always_on_top_focus_get(webview_window: tauri::WebviewWindow) -> Result<bool, String> {
    always_on_top::focused(&webview_window)
}
