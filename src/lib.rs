mod app;
mod commands;
mod domain;
mod infra;
mod shared;

pub(crate) use app::notice;
pub(crate) use infra::{app_paths, settings, window_state};

use app::app_state::{AlwaysOnTopState, MainWindowSlot, PopupsState, SettingsState};
use app::main_window;
use app::updater::PendingUpdateState;
use commands::*;
use domain::lifecycle;
use tauri::Manager;
use window_state::WindowStateStore;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let builder = tauri::Builder::default();

    // Must be the first plugin so a second instance exits before doing any work.
    #[cfg(desktop)]
    let builder = builder
        .plugin(tauri_plugin_single_instance::init(|app, _argv, _cwd| {
            tracing::info!("second instance launched, focusing existing window");
            main_window::focus_existing(app);
        }))
        .plugin(tauri_plugin_notification::init());

    let app = builder
        .plugin(tauri_plugin_opener::init())
        .manage(MainWindowSlot::default())
        .manage(PopupsState::default())
        .manage(AlwaysOnTopState::default())
        .manage(PendingUpdateState::default())
        .setup(|app| {
            crate::app::logging::init(app.handle());

            #[cfg(desktop)]
            crate::app::updater::register_plugin(app.handle());

            app.manage(SettingsState::new(settings::read_or_default(app.handle())));

            let store = match app_paths::window_state_path(app.handle()) {
                Ok(path) => WindowStateStore::load(path),
                Err(err) => {
                    tracing::warn!("window state will not persist: {}", err);
                    WindowStateStore::in_memory()
                }
            };
            app.manage(store);

            app.state::<MainWindowSlot>().mark_lock_acquired();
            tracing::info!("single-instance lock acquired");
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            app_about_get,
            app_exit,
            settings_get,
            settings_set,
            popups_configure,
            popup_open,
            always_on_top_set,
            always_on_top_focus_get
        ])
        .build(tauri::generate_context!())
        .expect("error while building tauri application");

    app.run(|app_handle, event| match event {
        tauri::RunEvent::Ready => {
            main_window::create_main_window(app_handle);
        }
        tauri::RunEvent::ExitRequested { api, code, .. } => {
            if lifecycle::should_prevent_exit(code, std::env::consts::OS) {
                tracing::info!("all windows closed, staying resident");
                api.prevent_exit();
                return;
            }
            tracing::info!(?code, "exit requested");
        }
        tauri::RunEvent::Exit => {
            app_handle.state::<MainWindowSlot>().terminate();
            if let Some(store) = app_handle.try_state::<WindowStateStore>() {
                store.save_best_effort();
            }
            crate::app::updater::install_pending(app_handle);
        }
        #[cfg(target_os = "macos")]
        tauri::RunEvent::Reopen { .. } => {
            if !app_handle.state::<MainWindowSlot>().has_window() {
                tracing::info!("activated with no main window, recreating");
                main_window::create_main_window(app_handle);
            }
        }
        _ => {}
    });
}
