//! Usage: Tauri IPC command surface exposed to the loaded content.

mod app;
mod settings;
mod window;

pub(crate) use app::*;
pub(crate) use settings::*;
pub(crate) use window::*;
