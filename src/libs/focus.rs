//! Tracks which input control currently holds focus.
//!
//! While an operator is typing into a prompt the grid must not be refreshed
//! underneath them. Each prompt takes a [`FocusGuard`] for as long as it is
//! open; the auto-refresh loop checks [`FocusManager::is_input_focused`] and
//! skips its tick while any guard is alive.

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Default)]
struct FocusState {
    next_id: u64,
    active: BTreeMap<u64, String>,
}

/// Shared registry of focused controls. Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct FocusManager {
    state: Arc<Mutex<FocusState>>,
}

impl FocusManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `control` as focused until the returned guard is dropped.
    pub fn acquire(&self, control: &str) -> FocusGuard {
        let mut state = self.state.lock();
        let id = state.next_id;
        state.next_id += 1;
        state.active.insert(id, control.to_string());
        tracing::trace!(control, "focus acquired");

        FocusGuard {
            id,
            state: Arc::clone(&self.state),
        }
    }

    pub fn is_input_focused(&self) -> bool {
        !self.state.lock().active.is_empty()
    }

    /// Names of the controls currently holding focus.
    pub fn focused_controls(&self) -> Vec<String> {
        self.state.lock().active.values().cloned().collect()
    }
}

/// Releases its focus registration on drop.
#[derive(Debug)]
pub struct FocusGuard {
    id: u64,
    state: Arc<Mutex<FocusState>>,
}

impl Drop for FocusGuard {
    fn drop(&mut self) {
        if let Some(control) = self.state.lock().active.remove(&self.id) {
            tracing::trace!(control = %control, "focus released");
        }
    }
}

/// The window the dashboard runs in.
pub trait WindowHost {
    /// Asks the host to bring the dashboard to the foreground. Advisory only.
    fn request_focus(&self);
}

/// Host for terminal sessions, where there is no window to raise.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalHost;

impl WindowHost for TerminalHost {
    fn request_focus(&self) {
        tracing::debug!("focus requested for terminal host");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_releases_on_drop() {
        let focus = FocusManager::new();
        assert!(!focus.is_input_focused());

        let guard = focus.acquire("search");
        assert!(focus.is_input_focused());
        assert_eq!(focus.focused_controls(), vec!["search".to_string()]);

        drop(guard);
        assert!(!focus.is_input_focused());
    }

    #[test]
    fn overlapping_guards_are_tracked_separately() {
        let focus = FocusManager::new();
        let shared = focus.clone();

        let first = focus.acquire("page jump");
        let second = shared.acquire("page jump");
        drop(first);
        assert!(focus.is_input_focused());
        drop(second);
        assert!(!shared.is_input_focused());
    }
}
