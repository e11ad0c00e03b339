//! Usage: Application layer (Tauri-managed state, window lifecycle, OS integration wiring).

pub(crate) mod always_on_top;
pub(crate) mod app_state;
pub(crate) mod certificate;
pub(crate) mod logging;
pub(crate) mod main_window;
pub(crate) mod menu;
pub(crate) mod notice;
pub(crate) mod popups;
pub(crate) mod updater;
