//! Usage: OS notifications raised from the Rust side.
//!
//! - `notice::show(app, notice::build(level, title, body))` raises a notification.
//! - Used by the updater to tell the user an update was downloaded.

pub const NOTICE_PREFIX: &str = "Jitsi Meet";

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct NoticePayload {
    pub level: NoticeLevel,
    pub title: String,
    pub body: String,
}

fn default_title(level: NoticeLevel) -> &'static str {
    match level {
        NoticeLevel::Info => "Info",
    }
}

fn normalize_optional_title(title: Option<String>) -> Option<String> {
    let title = title?;
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_string())
}

fn format_title(level: NoticeLevel, title: Option<String>) -> String {
    let title = normalize_optional_title(title).unwrap_or_else(|| default_title(level).to_string());
    format!("{NOTICE_PREFIX} · {title}")
}

pub fn build(level: NoticeLevel, title: Option<String>, body: String) -> NoticePayload {
    NoticePayload {
        level,
        title: format_title(level, title),
        body,
    }
}

#[cfg(desktop)]
pub fn show(app: &tauri::AppHandle, payload: NoticePayload) -> Result<(), String> {
    use tauri_plugin_notification::NotificationExt;

    app.notification()
        .builder()
        .title(payload.title)
        .body(payload.body)
        .show()
        .map_err(|e| format!("NOTICE_SHOW: {e}"))
}

#[cfg(not(desktop))]
pub fn show(_app: &tauri::AppHandle, _payload: NoticePayload) -> Result<(), String> {
    Ok(())
}
