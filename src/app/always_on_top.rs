//! Usage: Always-on-top coordination between a window and its loaded content.
//!
//! Focus changes are recorded per window and pushed to the content as
//! `always-on-top:focus-changed`. The bundled page is served from a `file://` origin, which the
//! capability ACL cannot grant `plugin:event|listen` to, so content reads the recorded state with
//! the `always_on_top_focus_get` command and pins the window through `always_on_top_set`.

use crate::app::app_state::{AlwaysOnTopState, SettingsState};
use tauri::{Emitter, Manager};

pub(crate) const FOCUS_CHANGED_EVENT: &str = "always-on-top:focus-changed";

#[derive(Debug, Clone, serde::Serialize)]
struct FocusChangedPayload {
    focused: bool,
}

pub(crate) fn setup(window: &tauri::WebviewWindow) {
    let state = window.state::<AlwaysOnTopState>();
    let focused = window.is_focused().unwrap_or(false);
    if !state.register(window.label(), focused) {
        return;
    }

    let tracked = window.clone();
    window.on_window_event(move |event| match event {
        tauri::WindowEvent::Focused(focused) => {
            tracked
                .state::<AlwaysOnTopState>()
                .record_focus(tracked.label(), *focused);
            let payload = FocusChangedPayload { focused: *focused };
            if let Err(err) = tracked.emit_to(tracked.label(), FOCUS_CHANGED_EVENT, payload) {
                tracing::debug!(window = %tracked.label(), "failed to emit focus change: {}", err);
            }
        }
        tauri::WindowEvent::Destroyed => {
            tracked.state::<AlwaysOnTopState>().unregister(tracked.label());
        }
        _ => {}
    });
}

fn unavailable(label: &str) -> String {
    format!("ALWAYS_ON_TOP_UNAVAILABLE: window {label} has no always-on-top coordination")
}

/// Last focus state recorded for `window`.
pub(crate) fn focused(window: &tauri::WebviewWindow) -> Result<bool, String> {
    window
        .state::<AlwaysOnTopState>()
        .focused(window.label())
        .ok_or_else(|| unavailable(window.label()))
}

/// Returns the resulting always-on-top state.
pub(crate) fn set(window: &tauri::WebviewWindow, enabled: bool) -> Result<bool, String> {
    if !window.state::<AlwaysOnTopState>().is_registered(window.label()) {
        return Err(unavailable(window.label()));
    }

    let allowed = window
        .try_state::<SettingsState>()
        .map(|state| state.snapshot().always_on_top_window_enabled)
        .unwrap_or(true);
    let enabled = enabled && allowed;

    window
        .set_always_on_top(enabled)
        .map_err(|e| format!("failed to set always-on-top: {e}"))?;
    tracing::debug!(window = %window.label(), enabled, "always-on-top updated");
    Ok(enabled)
}
