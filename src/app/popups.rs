//! Usage: Apply popup routing to a window: per-window rules, new-window interception, browser handoff.

use crate::app::app_state::PopupsState;
use crate::domain::popups::{
    popup_window_label, should_open_externally, PopupRoute, PopupsConfig, PopupsConfigInput,
};
use tauri::webview::NewWindowResponse;
use tauri::{Manager, Runtime, Url, WebviewUrl, WebviewWindowBuilder};
use tauri_plugin_opener::OpenerExt;

const POPUP_DEFAULT_WIDTH: f64 = 600.0;
const POPUP_DEFAULT_HEIGHT: f64 = 700.0;

/// Installs the built-in rules for `window` and drops them when the window goes away.
pub(crate) fn init_popups_configuration(window: &tauri::WebviewWindow) {
    let state = window.state::<PopupsState>();
    if state.is_configured(window.label()) {
        return;
    }
    state.install(window.label(), PopupsConfig::default());

    let tracked = window.clone();
    window.on_window_event(move |event| {
        if let tauri::WindowEvent::Destroyed = event {
            tracked.state::<PopupsState>().remove(tracked.label());
        }
    });
}

/// Replaces the rules for `label` with ones supplied by the loaded content.
pub(crate) fn configure(
    app: &tauri::AppHandle,
    label: &str,
    input: &PopupsConfigInput,
) -> Result<Vec<String>, String> {
    let config = PopupsConfig::from_input(input)?;
    let names = config.rule_names().into_iter().map(str::to_string).collect();
    app.state::<PopupsState>().install(label, config);
    tracing::info!(window = %label, rules = ?names, "popup rules updated");
    Ok(names)
}

pub(crate) fn resolve(
    app: &tauri::AppHandle,
    label: &str,
    url: &str,
    frame_name: Option<&str>,
) -> Option<PopupRoute> {
    app.state::<PopupsState>()
        .with_config(label, |config| config.resolve(url, frame_name))
}

fn open_in_browser(app: &tauri::AppHandle, url: &str) -> Result<(), String> {
    app.opener()
        .open_url(url, None::<&str>)
        .map_err(|e| format!("OPEN_EXTERNAL: {e}"))
}

/// Passes `url` to `open` exactly as requested when the route leaves the app.
/// Returns the in-app role otherwise, without calling `open`.
fn hand_off<F>(route: Option<PopupRoute>, url: &str, open: F) -> Result<Option<String>, String>
where
    F: FnOnce(&str) -> Result<(), String>,
{
    match route {
        Some(route) if !should_open_externally(Some(&route)) => Ok(Some(route.role)),
        _ => {
            open(url)?;
            Ok(None)
        }
    }
}

pub(crate) fn route_new_window<R, F>(
    route: Option<PopupRoute>,
    url: &str,
    open: F,
) -> NewWindowResponse<R>
where
    R: Runtime,
    F: FnOnce(&str) -> Result<(), String>,
{
    match hand_off(route, url, open) {
        Ok(Some(role)) => {
            tracing::info!(url = %url, role = %role, "allowing in-app popup");
            NewWindowResponse::Allow
        }
        Ok(None) => {
            tracing::info!(url = %url, "routed new window to the default browser");
            NewWindowResponse::Deny
        }
        Err(err) => {
            tracing::warn!(url = %url, "failed to open external url: {}", err);
            NewWindowResponse::Deny
        }
    }
}

/// Handler for content-initiated `window.open` requests on `opener_label`.
pub(crate) fn on_new_window(
    app: &tauri::AppHandle,
    opener_label: &str,
    url: Url,
) -> NewWindowResponse<tauri::Wry> {
    let route = resolve(app, opener_label, url.as_str(), None);
    route_new_window(route, url.as_str(), |target| open_in_browser(app, target))
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub(crate) enum PopupOpenOutcome {
    Browser,
    InApp { label: String },
}

/// Explicit popup request carrying a frame name (`popup_open` command).
pub(crate) fn open_popup(
    app: &tauri::AppHandle,
    opener_label: &str,
    raw_url: &str,
    frame_name: Option<&str>,
) -> Result<PopupOpenOutcome, String> {
    // Parsed only for validation and in-app navigation; the browser gets `raw_url` untouched.
    let url = Url::parse(raw_url.trim())
        .map_err(|e| format!("SEC_INVALID_INPUT: invalid popup url: {e}"))?;

    let route = resolve(app, opener_label, raw_url, frame_name);
    let Some(role) = hand_off(route, raw_url, |target| open_in_browser(app, target))? else {
        return Ok(PopupOpenOutcome::Browser);
    };

    let label = popup_window_label(&role);
    if let Some(existing) = app.get_webview_window(&label) {
        existing
            .navigate(url)
            .map_err(|e| format!("failed to navigate popup {label}: {e}"))?;
        let _ = existing.unminimize();
        let _ = existing.set_focus();
        return Ok(PopupOpenOutcome::InApp { label });
    }

    let mut builder = WebviewWindowBuilder::new(app, &label, WebviewUrl::External(url))
        .title(&role)
        .inner_size(POPUP_DEFAULT_WIDTH, POPUP_DEFAULT_HEIGHT);
    if let Some(opener) = app.get_webview_window(opener_label) {
        builder = builder
            .parent(&opener)
            .map_err(|e| format!("failed to attach popup {label} to {opener_label}: {e}"))?;
    }
    builder
        .build()
        .map_err(|e| format!("failed to create popup {label}: {e}"))?;

    tracing::info!(label = %label, "opened in-app popup");
    Ok(PopupOpenOutcome::InApp { label })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::popups::PopupTarget;

    const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/auth?client_id=abc";

    fn route(target: PopupTarget) -> PopupRoute {
        PopupRoute {
            role: "google-auth".to_string(),
            target,
        }
    }

    fn route_recording(
        route: Option<PopupRoute>,
        url: &str,
    ) -> (NewWindowResponse<tauri::Wry>, Vec<String>) {
        let mut opened = Vec::new();
        let response = route_new_window(route, url, |target| {
            opened.push(target.to_string());
            Ok(())
        });
        (response, opened)
    }

    #[test]
    fn browser_route_denies_and_opens_once() {
        let (response, opened) = route_recording(Some(route(PopupTarget::Browser)), AUTH_URL);
        assert!(matches!(response, NewWindowResponse::Deny));
        assert_eq!(opened, vec![AUTH_URL.to_string()]);
    }

    #[test]
    fn unmatched_url_denies_and_opens_once() {
        let url = "https://example.com/docs";
        let (response, opened) = route_recording(None, url);
        assert!(matches!(response, NewWindowResponse::Deny));
        assert_eq!(opened, vec![url.to_string()]);
    }

    #[test]
    fn in_app_route_allows_without_opening() {
        let (response, opened) = route_recording(Some(route(PopupTarget::InApp)), AUTH_URL);
        assert!(matches!(response, NewWindowResponse::Allow));
        assert!(opened.is_empty());
    }

    #[test]
    fn default_rules_keep_oauth_in_app() {
        let resolved = PopupsConfig::default().resolve(AUTH_URL, None);
        let (response, opened) = route_recording(resolved, AUTH_URL);
        assert!(matches!(response, NewWindowResponse::Allow));
        assert!(opened.is_empty());
    }

    #[test]
    fn opener_failure_still_denies() {
        let response: NewWindowResponse<tauri::Wry> =
            route_new_window(None, "https://example.com", |_| Err("no handler".to_string()));
        assert!(matches!(response, NewWindowResponse::Deny));
    }

    #[test]
    fn browser_handoff_passes_the_requested_url_unmodified() {
        let raw = "https://Example.com?q=a b";
        let mut opened = Vec::new();
        let role = hand_off(None, raw, |target| {
            opened.push(target.to_string());
            Ok(())
        })
        .expect("hand off");
        assert_eq!(role, None);
        assert_eq!(opened, vec![raw.to_string()]);
    }

    #[test]
    fn in_app_handoff_returns_role() {
        let role = hand_off(Some(route(PopupTarget::InApp)), AUTH_URL, |_| {
            Err("must not open".to_string())
        })
        .expect("hand off");
        assert_eq!(role.as_deref(), Some("google-auth"));
    }
}
