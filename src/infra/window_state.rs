//! Usage: File-backed window geometry store (`window-state.json`) and live tracking of windows.
//!
//! Geometry is captured in memory on every move/resize and flushed to disk when the tracked
//! window closes and at process exit.

use crate::domain::window_geometry::{restore_geometry, DisplayBounds, WindowGeometry};
use crate::shared::fs::{read_optional_file, write_file_atomic};
use crate::shared::mutex_ext::MutexExt;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tauri::{Manager, PhysicalPosition, PhysicalSize};

type GeometryByLabel = BTreeMap<String, WindowGeometry>;

pub(crate) struct WindowStateStore {
    path: Option<PathBuf>,
    states: Mutex<GeometryByLabel>,
}

impl WindowStateStore {
    /// A store that never touches disk (used when the config dir cannot be resolved).
    pub(crate) fn in_memory() -> Self {
        Self {
            path: None,
            states: Mutex::new(GeometryByLabel::new()),
        }
    }

    /// Loads the store; a corrupt file is logged and replaced on the next save.
    pub(crate) fn load(path: PathBuf) -> Self {
        let states = match read_states(&path) {
            Ok(states) => states,
            Err(err) => {
                tracing::warn!(path = %path.display(), "window state unreadable, starting fresh: {}", err);
                GeometryByLabel::new()
            }
        };
        Self {
            path: Some(path),
            states: Mutex::new(states),
        }
    }

    /// Stored geometry for `label` if it can be reopened as-is; `None` means use the defaults.
    pub(crate) fn restore(&self, label: &str, displays: &[DisplayBounds]) -> Option<WindowGeometry> {
        let stored = self.states.lock_or_recover().get(label).copied();
        restore_geometry(stored, displays)
    }

    pub(crate) fn update_bounds(&self, label: &str, x: f64, y: f64, width: f64, height: f64) {
        let mut states = self.states.lock_or_recover();
        let current = states.get(label).copied().unwrap_or_default();
        let next = WindowGeometry {
            maximized: false,
            fullscreen: false,
            ..current.with_bounds(x, y, width, height)
        };
        states.insert(label.to_string(), next);
    }

    /// Records maximized/fullscreen without overwriting the last normal bounds.
    pub(crate) fn update_flags(&self, label: &str, maximized: bool, fullscreen: bool) {
        let mut states = self.states.lock_or_recover();
        let entry = states.entry(label.to_string()).or_default();
        entry.maximized = maximized;
        entry.fullscreen = fullscreen;
    }

    pub(crate) fn save(&self) -> Result<(), String> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };
        let snapshot = self.states.lock_or_recover().clone();
        let bytes = serde_json::to_vec_pretty(&snapshot)
            .map_err(|e| format!("failed to serialize window state: {e}"))?;
        write_file_atomic(path, &bytes)
    }

    pub(crate) fn save_best_effort(&self) {
        if let Err(err) = self.save() {
            tracing::warn!("failed to persist window state: {}", err);
        }
    }
}

fn read_states(path: &Path) -> Result<GeometryByLabel, String> {
    let Some(bytes) = read_optional_file(path)? else {
        return Ok(GeometryByLabel::new());
    };
    serde_json::from_slice(&bytes).map_err(|e| format!("failed to parse window state: {e}"))
}

fn bounds_of(position: PhysicalPosition<i32>, size: PhysicalSize<u32>) -> DisplayBounds {
    DisplayBounds {
        x: f64::from(position.x),
        y: f64::from(position.y),
        width: f64::from(size.width),
        height: f64::from(size.height),
    }
}

/// Full bounds of every connected monitor in physical pixels (one coordinate space across
/// mixed scale factors); empty if they cannot be queried.
pub(crate) fn display_bounds(app: &tauri::AppHandle) -> Vec<DisplayBounds> {
    let monitors = match app.available_monitors() {
        Ok(monitors) => monitors,
        Err(err) => {
            tracing::debug!("failed to query monitors: {}", err);
            return Vec::new();
        }
    };
    monitors
        .iter()
        .map(|monitor| bounds_of(*monitor.position(), *monitor.size()))
        .collect()
}

/// Applies restored geometry to a freshly built (still hidden) window.
pub(crate) fn apply(window: &tauri::WebviewWindow, geometry: &WindowGeometry) {
    let size = PhysicalSize::new(geometry.width.round() as u32, geometry.height.round() as u32);
    if let Err(err) = window.set_size(size) {
        tracing::debug!(window = %window.label(), "failed to restore size: {}", err);
    }
    if let (Some(x), Some(y)) = (geometry.x, geometry.y) {
        let position = PhysicalPosition::new(x.round() as i32, y.round() as i32);
        if let Err(err) = window.set_position(position) {
            tracing::debug!(window = %window.label(), "failed to restore position: {}", err);
        }
    }
    if geometry.fullscreen {
        let _ = window.set_fullscreen(true);
    } else if geometry.maximized {
        let _ = window.maximize();
    }
}

fn capture(window: &tauri::WebviewWindow) {
    if window.is_minimized().unwrap_or(false) {
        return;
    }

    let store = window.state::<WindowStateStore>();
    let label = window.label();
    let maximized = window.is_maximized().unwrap_or(false);
    let fullscreen = window.is_fullscreen().unwrap_or(false);
    if maximized || fullscreen {
        store.update_flags(label, maximized, fullscreen);
        return;
    }

    let (Ok(position), Ok(size)) = (window.outer_position(), window.inner_size()) else {
        return;
    };
    let bounds = bounds_of(position, size);
    store.update_bounds(label, bounds.x, bounds.y, bounds.width, bounds.height);
}

/// Keeps the store in sync with `window` for the rest of its life.
pub(crate) fn track(window: &tauri::WebviewWindow) {
    let tracked = window.clone();
    window.on_window_event(move |event| match event {
        tauri::WindowEvent::Moved(_) | tauri::WindowEvent::Resized(_) => capture(&tracked),
        tauri::WindowEvent::CloseRequested { .. } => {
            capture(&tracked);
            tracked.state::<WindowStateStore>().save_best_effort();
        }
        tauri::WindowEvent::Destroyed => {
            tracked.state::<WindowStateStore>().save_best_effort();
        }
        _ => {}
    });
}
