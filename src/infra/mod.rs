//! Usage: Infrastructure adapters (filesystem paths, persisted settings, window state).

pub(crate) mod app_paths;
pub(crate) mod settings;
pub(crate) mod window_state;
