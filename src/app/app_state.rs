//! Usage: Tauri-managed state shared by lifecycle hooks, window wiring, and `commands/*`.

use crate::domain::lifecycle::BootstrapPhase;
use crate::domain::popups::PopupsConfig;
use crate::settings::DesktopSettings;
use crate::shared::mutex_ext::MutexExt;
use std::collections::HashMap;
use std::sync::Mutex;

/// Single-slot registry for the main window; the phase doubles as the "is there a window" flag.
#[derive(Default)]
pub(crate) struct MainWindowSlot(Mutex<BootstrapPhase>);

impl MainWindowSlot {
    pub(crate) fn phase(&self) -> BootstrapPhase {
        *self.0.lock_or_recover()
    }

    pub(crate) fn has_window(&self) -> bool {
        self.phase().has_window()
    }

    pub(crate) fn mark_lock_acquired(&self) {
        let mut phase = self.0.lock_or_recover();
        *phase = phase.lock_acquired();
    }

    /// Claims the slot; `false` means a window already exists (or the process is terminating).
    pub(crate) fn try_begin_construction(&self) -> bool {
        let mut phase = self.0.lock_or_recover();
        match phase.begin_construction() {
            Some(next) => {
                *phase = next;
                true
            }
            None => false,
        }
    }

    /// `true` only for the first reveal after construction.
    pub(crate) fn mark_shown(&self) -> bool {
        let mut phase = self.0.lock_or_recover();
        match phase.reveal() {
            Some(next) => {
                *phase = next;
                true
            }
            None => false,
        }
    }

    pub(crate) fn release(&self) {
        let mut phase = self.0.lock_or_recover();
        *phase = phase.window_destroyed();
    }

    pub(crate) fn terminate(&self) {
        let mut phase = self.0.lock_or_recover();
        *phase = phase.terminated();
    }
}

pub(crate) struct SettingsState(pub(crate) Mutex<DesktopSettings>);

impl SettingsState {
    pub(crate) fn new(settings: DesktopSettings) -> Self {
        Self(Mutex::new(settings))
    }

    pub(crate) fn snapshot(&self) -> DesktopSettings {
        self.0.lock_or_recover().clone()
    }

    pub(crate) fn replace(&self, settings: DesktopSettings) {
        *self.0.lock_or_recover() = settings;
    }
}

/// Popup rules per window label.
#[derive(Default)]
pub(crate) struct PopupsState(Mutex<HashMap<String, PopupsConfig>>);

impl PopupsState {
    pub(crate) fn install(&self, label: &str, config: PopupsConfig) {
        self.0.lock_or_recover().insert(label.to_string(), config);
    }

    pub(crate) fn is_configured(&self, label: &str) -> bool {
        self.0.lock_or_recover().contains_key(label)
    }

    pub(crate) fn remove(&self, label: &str) {
        self.0.lock_or_recover().remove(label);
    }

    /// Runs `f` against the window's rules; unconfigured windows see an empty rule set.
    pub(crate) fn with_config<T>(&self, label: &str, f: impl FnOnce(&PopupsConfig) -> T) -> T {
        let guard = self.0.lock_or_recover();
        match guard.get(label) {
            Some(config) => f(config),
            None => f(&PopupsConfig::empty()),
        }
    }
}

/// Windows that had always-on-top coordination set up, with their last known focus.
#[derive(Default)]
pub(crate) struct AlwaysOnTopState(Mutex<HashMap<String, bool>>);

impl AlwaysOnTopState {
    /// `false` if the window was already registered.
    pub(crate) fn register(&self, label: &str, focused: bool) -> bool {
        let mut windows = self.0.lock_or_recover();
        if windows.contains_key(label) {
            return false;
        }
        windows.insert(label.to_string(), focused);
        true
    }

    pub(crate) fn is_registered(&self, label: &str) -> bool {
        self.0.lock_or_recover().contains_key(label)
    }

    /// Ignored for windows that are not registered.
    pub(crate) fn record_focus(&self, label: &str, focused: bool) {
        if let Some(entry) = self.0.lock_or_recover().get_mut(label) {
            *entry = focused;
        }
    }

    pub(crate) fn focused(&self, label: &str) -> Option<bool> {
        self.0.lock_or_recover().get(label).copied()
    }

    pub(crate) fn unregister(&self, label: &str) {
        self.0.lock_or_recover().remove(label);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_allows_a_single_main_window() {
        let slot = MainWindowSlot::default();
        assert!(!slot.try_begin_construction());

        slot.mark_lock_acquired();
        assert!(slot.try_begin_construction());
        assert!(!slot.try_begin_construction());
        assert!(slot.has_window());
    }

    #[test]
    fn slot_reveals_once_and_reopens_after_release() {
        let slot = MainWindowSlot::default();
        slot.mark_lock_acquired();
        assert!(slot.try_begin_construction());
        assert!(slot.mark_shown());
        assert!(!slot.mark_shown());

        slot.release();
        assert!(!slot.has_window());
        assert_eq!(slot.phase(), BootstrapPhase::Closed);

        assert!(slot.try_begin_construction());
        assert!(slot.mark_shown());
    }

    #[test]
    fn terminated_slot_refuses_construction() {
        let slot = MainWindowSlot::default();
        slot.mark_lock_acquired();
        slot.terminate();
        assert!(!slot.try_begin_construction());
    }

    #[test]
    fn unconfigured_window_has_no_popup_rules() {
        let state = PopupsState::default();
        let route = state.with_config("main", |config| {
            config.resolve("https://accounts.google.com/o/oauth2/auth", None)
        });
        assert!(route.is_none());

        state.install("main", PopupsConfig::default());
        assert!(state.is_configured("main"));
        let route = state.with_config("main", |config| {
            config.resolve("https://accounts.google.com/o/oauth2/auth", None)
        });
        assert!(route.is_some());

        state.remove("main");
        assert!(!state.is_configured("main"));
    }

    #[test]
    fn always_on_top_registration_is_once_per_window() {
        let state = AlwaysOnTopState::default();
        assert!(state.register("main", false));
        assert!(!state.register("main", true));
        assert!(state.is_registered("main"));
        assert_eq!(state.focused("main"), Some(false));
        state.unregister("main");
        assert!(!state.is_registered("main"));
    }

    #[test]
    fn always_on_top_focus_is_readable_after_changes() {
        let state = AlwaysOnTopState::default();
        state.record_focus("main", true);
        assert_eq!(state.focused("main"), None);

        state.register("main", false);
        state.record_focus("main", true);
        assert_eq!(state.focused("main"), Some(true));
        state.record_focus("main", false);
        assert_eq!(state.focused("main"), Some(false));

        state.unregister("main");
        assert_eq!(state.focused("main"), None);
    }

    #[test]
    fn settings_state_replace_is_visible_in_snapshot() {
        let state = SettingsState::new(DesktopSettings::default());
        let mut next = state.snapshot();
        next.auto_update_check = false;
        state.replace(next.clone());
        assert_eq!(state.snapshot(), next);
    }
}
