//! Usage: Startup phase machine for the single main window, plus the platform exit policy.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BootstrapPhase {
    NotStarted,
    LockAcquired,
    WindowConstructed,
    Shown,
    Closed,
    Terminated,
}

impl Default for BootstrapPhase {
    fn default() -> Self {
        Self::NotStarted
    }
}

impl BootstrapPhase {
    pub(crate) fn has_window(self) -> bool {
        matches!(self, Self::WindowConstructed | Self::Shown)
    }

    pub(crate) fn lock_acquired(self) -> Self {
        match self {
            Self::NotStarted => Self::LockAcquired,
            other => other,
        }
    }

    /// `Some(next)` when a main window may be constructed from this phase.
    pub(crate) fn begin_construction(self) -> Option<Self> {
        match self {
            Self::LockAcquired | Self::Closed => Some(Self::WindowConstructed),
            _ => None,
        }
    }

    /// `Some(next)` only for the first reveal of a constructed window.
    pub(crate) fn reveal(self) -> Option<Self> {
        match self {
            Self::WindowConstructed => Some(Self::Shown),
            _ => None,
        }
    }

    pub(crate) fn window_destroyed(self) -> Self {
        match self {
            Self::WindowConstructed | Self::Shown => Self::Closed,
            other => other,
        }
    }

    pub(crate) fn terminated(self) -> Self {
        Self::Terminated
    }
}

/// What to do when the last window closed and nobody asked for an explicit exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LastWindowClosed {
    Exit,
    StayResident,
}

pub(crate) fn last_window_closed_policy(target_os: &str) -> LastWindowClosed {
    if target_os == "macos" {
        LastWindowClosed::StayResident
    } else {
        LastWindowClosed::Exit
    }
}

/// `exit_code` is `None` when the runtime raises the exit request because every window closed.
pub(crate) fn should_prevent_exit(exit_code: Option<i32>, target_os: &str) -> bool {
    exit_code.is_none() && last_window_closed_policy(target_os) == LastWindowClosed::StayResident
}
