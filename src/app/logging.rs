//! Usage: Process-wide tracing setup (stderr + daily rolling file in the app log dir).

use crate::app_paths;
use crate::shared::mutex_ext::MutexExt;
use std::sync::Mutex;
use tauri::Manager;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter};

const LOG_FILTER_ENV: &str = "JITSI_MEET_LOG";
const LOG_FILE_PREFIX: &str = "jitsi-meet.log";
const DEFAULT_FILTER: &str = "info";
// Appended unless the directives already mention the updater, so update progress stays
// visible when `JITSI_MEET_LOG` turns the rest of the app down.
const UPDATER_TARGET: &str = "tauri_plugin_updater";
const UPDATER_DIRECTIVE: &str = "tauri_plugin_updater=info";

/// Keeps the non-blocking file writer alive for the lifetime of the app.
#[derive(Default)]
pub(crate) struct LogGuardState(Mutex<Option<WorkerGuard>>);

impl LogGuardState {
    fn set(&self, guard: WorkerGuard) {
        *self.0.lock_or_recover() = Some(guard);
    }
}

fn filter_directives(raw: Option<&str>) -> String {
    let base = raw
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_FILTER);
    if base.contains(UPDATER_TARGET) {
        return base.to_string();
    }
    format!("{base},{UPDATER_DIRECTIVE}")
}

fn build_filter(raw: Option<&str>) -> EnvFilter {
    let directives = filter_directives(raw);
    EnvFilter::try_new(&directives).unwrap_or_else(|err| {
        let fallback = filter_directives(None);
        eprintln!("invalid {LOG_FILTER_ENV}={directives:?}: {err}; falling back to {fallback}");
        EnvFilter::new(fallback)
    })
}

pub(crate) fn init(app: &tauri::AppHandle) {
    let raw = std::env::var(LOG_FILTER_ENV).ok();
    let filter = build_filter(raw.as_deref());

    let (file_layer, guard) = match app_paths::log_dir(app) {
        Ok(dir) => {
            let appender = tracing_appender::rolling::daily(&dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        Err(err) => {
            eprintln!("file logging disabled: {err}");
            (None, None)
        }
    };

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer);

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        // Already initialized (e.g. a second Builder in tests); keep the existing subscriber.
        return;
    }
    if let Err(err) = tracing_log::LogTracer::init() {
        tracing::debug!("log bridge not installed: {}", err);
    }

    if let Some(guard) = guard {
        app.manage(LogGuardState::default());
        app.state::<LogGuardState>().set(guard);
    }

    tracing::info!(
        version = %app.package_info().version,
        os = std::env::consts::OS,
        "logging initialized"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_directives_when_env_missing_or_blank() {
        assert_eq!(filter_directives(None), "info,tauri_plugin_updater=info");
        assert_eq!(filter_directives(Some("   ")), "info,tauri_plugin_updater=info");
    }

    #[test]
    fn env_directives_override_default_but_keep_updater_at_info() {
        assert_eq!(
            filter_directives(Some(" warn,tao=error ")),
            "warn,tao=error,tauri_plugin_updater=info"
        );
    }

    #[test]
    fn explicit_updater_directive_from_env_wins() {
        assert_eq!(
            filter_directives(Some("warn,tauri_plugin_updater=debug")),
            "warn,tauri_plugin_updater=debug"
        );
    }

    #[test]
    fn composed_filters_parse() {
        assert!(EnvFilter::try_new(filter_directives(None)).is_ok());
        assert!(EnvFilter::try_new(filter_directives(Some("error"))).is_ok());
    }
}
