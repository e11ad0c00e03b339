//! Usage: Pure decision logic (no Tauri handles): window lifecycle, geometry, popups, TLS policy.

pub(crate) mod lifecycle;
pub(crate) mod popups;
pub(crate) mod tls_policy;
pub(crate) mod window_geometry;
