//! Usage: Construct, reveal, and focus the single main window.

use crate::app::app_state::MainWindowSlot;
use crate::app::{always_on_top, certificate, menu, popups, updater};
use crate::app_paths;
use crate::domain::window_geometry::{DEFAULT_HEIGHT, DEFAULT_WIDTH, MIN_HEIGHT, MIN_WIDTH};
use crate::window_state::{self, WindowStateStore};
use tauri::webview::PageLoadEvent;
use tauri::{Manager, WebviewUrl, WebviewWindowBuilder};

pub(crate) const MAIN_WINDOW_LABEL: &str = "main";

/// Builds the main window unless one already exists. Safe to call from both `Ready` and `Reopen`.
pub(crate) fn create_main_window(app: &tauri::AppHandle) {
    let slot = app.state::<MainWindowSlot>();
    if !slot.try_begin_construction() {
        tracing::debug!(phase = ?slot.phase(), "main window already present, skipping construction");
        return;
    }

    if let Err(err) = build_main_window(app) {
        tracing::error!("main window construction failed: {}", err);
        slot.release();
    }
}

fn build_main_window(app: &tauri::AppHandle) -> Result<(), String> {
    if let Err(err) = menu::install_application_menu(app) {
        tracing::warn!("application menu setup failed: {}", err);
    }

    updater::spawn_check(app);

    let displays = window_state::display_bounds(app);
    let geometry = app
        .state::<WindowStateStore>()
        .restore(MAIN_WINDOW_LABEL, &displays);

    let base = app_paths::base_dir(app)?;
    let entry_url = app_paths::entry_url(&base)?;
    tracing::info!(url = %entry_url, ?geometry, "creating main window");

    let new_window_app = app.clone();
    let mut builder =
        WebviewWindowBuilder::new(app, MAIN_WINDOW_LABEL, WebviewUrl::External(entry_url))
            .title(&app.package_info().name)
            .inner_size(DEFAULT_WIDTH, DEFAULT_HEIGHT)
            .center()
            .min_inner_size(MIN_WIDTH, MIN_HEIGHT)
            .visible(false)
            .on_new_window(move |url, _features| {
                popups::on_new_window(&new_window_app, MAIN_WINDOW_LABEL, url)
            })
            .on_page_load(|window, payload| {
                if let PageLoadEvent::Finished = payload.event() {
                    reveal_main_window(&window);
                }
            });

    let icon = tauri::image::Image::from_bytes(include_bytes!("../../icons/icon_512x512.png"))
        .map_err(|e| format!("failed to load window icon: {e}"))?;
    builder = builder
        .icon(icon)
        .map_err(|e| format!("failed to set window icon: {e}"))?;

    #[cfg(target_os = "macos")]
    {
        builder = builder
            .title_bar_style(tauri::TitleBarStyle::Overlay)
            .hidden_title(true);
    }

    let window = builder
        .build()
        .map_err(|e| format!("failed to create main window: {e}"))?;

    // Stored geometry is in physical pixels; the builder only takes logical units.
    if let Some(geometry) = &geometry {
        window_state::apply(&window, geometry);
    }

    window_state::track(&window);
    popups::init_popups_configuration(&window);
    always_on_top::setup(&window);
    certificate::install(&window);

    let destroyed_app = app.clone();
    window.on_window_event(move |event| {
        if let tauri::WindowEvent::Destroyed = event {
            tracing::info!("main window destroyed");
            destroyed_app.state::<MainWindowSlot>().release();
        }
    });

    Ok(())
}

fn reveal_main_window(window: &tauri::WebviewWindow) {
    if !window.state::<MainWindowSlot>().mark_shown() {
        return;
    }
    tracing::info!("main window content ready, showing");
    if let Err(err) = window.show() {
        tracing::warn!("failed to show main window: {}", err);
    }
    let _ = window.set_focus();
}

/// Second-instance handoff: bring the existing window forward.
pub(crate) fn focus_existing(app: &tauri::AppHandle) {
    let Some(window) = app.get_webview_window(MAIN_WINDOW_LABEL) else {
        tracing::info!("second instance launched while no main window exists");
        return;
    };

    if window.is_minimized().unwrap_or(false) {
        let _ = window.unminimize();
    }
    let _ = window.show();
    let _ = window.set_focus();
}
