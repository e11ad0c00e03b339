//! Usage: Background update check: download a newer release, notify, install on exit.

use crate::app::app_state::SettingsState;
use crate::notice;
use crate::shared::mutex_ext::MutexExt;
use std::sync::Mutex;
use tauri::Manager;

/// A downloaded update waiting for the process to exit.
#[derive(Default)]
pub(crate) struct PendingUpdateState(Mutex<Option<PendingUpdate>>);

pub(crate) struct PendingUpdate {
    #[cfg(desktop)]
    update: tauri_plugin_updater::Update,
    version: String,
    bytes: Vec<u8>,
}

impl PendingUpdateState {
    pub(crate) fn is_pending(&self) -> bool {
        self.0.lock_or_recover().is_some()
    }

    fn store(&self, pending: PendingUpdate) {
        *self.0.lock_or_recover() = Some(pending);
    }

    fn take(&self) -> Option<PendingUpdate> {
        self.0.lock_or_recover().take()
    }
}

#[cfg(desktop)]
pub(crate) fn register_plugin(app: &tauri::AppHandle) {
    if let Err(err) = app.plugin(tauri_plugin_updater::Builder::new().build()) {
        tracing::error!("updater plugin init failed: {}", err);
    }
}

/// Fire-and-forget; the outcome is only logged and, on success, notified.
pub(crate) fn spawn_check(app: &tauri::AppHandle) {
    let enabled = app
        .try_state::<SettingsState>()
        .map(|state| state.snapshot().auto_update_check)
        .unwrap_or(true);
    if !enabled {
        tracing::info!("update check disabled in settings, skipping");
        return;
    }
    if app.state::<PendingUpdateState>().is_pending() {
        tracing::debug!("update already downloaded, skipping check");
        return;
    }

    #[cfg(desktop)]
    {
        let app = app.clone();
        tauri::async_runtime::spawn(async move {
            if let Err(err) = check_and_notify(&app).await {
                tracing::warn!("update check failed: {}", err);
            }
        });
    }
}

#[cfg(desktop)]
async fn check_and_notify(app: &tauri::AppHandle) -> Result<(), String> {
    use tauri_plugin_updater::UpdaterExt;

    let current_version = app.package_info().version.to_string();
    let started = std::time::Instant::now();
    let updater = app.updater().map_err(|e| format!("UPDATER_INIT: {e}"))?;
    let update = updater
        .check()
        .await
        .map_err(|e| format!("UPDATER_CHECK: {e}"))?;

    let Some(update) = update else {
        tracing::info!(
            current_version = %current_version,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "no update available"
        );
        return Ok(());
    };

    let version = update.version.clone();
    tracing::info!(
        current_version = %current_version,
        latest_version = %version,
        "update available, downloading"
    );

    let bytes = update
        .download(|_chunk, _total| {}, || {})
        .await
        .map_err(|e| format!("UPDATER_DOWNLOAD: {e}"))?;

    tracing::info!(latest_version = %version, size = bytes.len(), "update downloaded");
    app.state::<PendingUpdateState>().store(PendingUpdate {
        update,
        version: version.clone(),
        bytes,
    });

    let payload = notice::build(
        notice::NoticeLevel::Info,
        Some("Update ready".to_string()),
        format!("Version {version} has been downloaded and will be installed when you quit."),
    );
    if let Err(err) = notice::show(app, payload) {
        tracing::warn!("failed to show update notice: {}", err);
    }
    Ok(())
}

/// Installs a downloaded update; called once the event loop is exiting.
pub(crate) fn install_pending(app: &tauri::AppHandle) {
    let Some(state) = app.try_state::<PendingUpdateState>() else {
        return;
    };
    let Some(pending) = state.take() else {
        return;
    };

    tracing::info!(latest_version = %pending.version, "installing downloaded update");
    #[cfg(desktop)]
    {
        if let Err(err) = pending.update.install(&pending.bytes) {
            tracing::error!(latest_version = %pending.version, "update install failed: {}", err);
        }
    }
    #[cfg(not(desktop))]
    let _ = pending.bytes;
}
