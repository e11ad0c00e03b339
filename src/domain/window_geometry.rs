//! Usage: Window geometry model and restore rules for persisted window state.

use serde::{Deserialize, Serialize};

pub(crate) const DEFAULT_WIDTH: f64 = 800.0;
pub(crate) const DEFAULT_HEIGHT: f64 = 600.0;
pub(crate) const MIN_WIDTH: f64 = 800.0;
pub(crate) const MIN_HEIGHT: f64 = 600.0;

/// Physical-pixel geometry of a window role, in the same desktop coordinate space as
/// [`DisplayBounds`]. Missing `x`/`y` means "let the OS center it".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct WindowGeometry {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: f64,
    pub height: f64,
    pub maximized: bool,
    pub fullscreen: bool,
}

impl Default for WindowGeometry {
    fn default() -> Self {
        Self::with_size(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

/// Full bounds of a display in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct DisplayBounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl DisplayBounds {
    fn contains(&self, x: f64, y: f64, width: f64, height: f64) -> bool {
        x >= self.x
            && y >= self.y
            && x + width <= self.x + self.width
            && y + height <= self.y + self.height
    }
}

impl WindowGeometry {
    pub(crate) fn with_size(width: f64, height: f64) -> Self {
        Self {
            x: None,
            y: None,
            width,
            height,
            maximized: false,
            fullscreen: false,
        }
    }

    fn has_usable_size(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width >= 1.0 && self.height >= 1.0
    }

    /// True when the stored bounds fit entirely inside one display.
    /// Geometry without a position is always considered visible.
    pub(crate) fn is_visible_on_some_display(&self, displays: &[DisplayBounds]) -> bool {
        let (Some(x), Some(y)) = (self.x, self.y) else {
            return true;
        };
        if !x.is_finite() || !y.is_finite() {
            return false;
        }
        displays
            .iter()
            .any(|display| display.contains(x, y, self.width, self.height))
    }

    /// Updates the normal (non-maximized) bounds while keeping the state flags.
    pub(crate) fn with_bounds(self, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            width,
            height,
            ..self
        }
    }
}

/// Picks the stored geometry a window should reopen with.
///
/// `None` means "open with the defaults": nothing was stored, the stored size is unusable, or
/// the stored position lies outside every known display. An empty display list means the
/// displays could not be queried, so the stored position is trusted.
pub(crate) fn restore_geometry(
    stored: Option<WindowGeometry>,
    displays: &[DisplayBounds],
) -> Option<WindowGeometry> {
    let stored = stored?;
    if !stored.has_usable_size() {
        return None;
    }
    if !displays.is_empty() && !stored.is_visible_on_some_display(displays) {
        return None;
    }
    Some(stored)
}
