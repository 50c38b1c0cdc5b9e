//! Navigation seam used for the 403 redirect.

use std::sync::Mutex;

/// Well-known routes.
pub struct Routes;

impl Routes {
    pub const START_PAGE: &'static str = "/";
}

/// Replaces the current location without adding a history entry.
pub trait Navigator: Send + Sync {
    fn replace_state(&self, route: &str);
}

/// In-memory [`Navigator`] that remembers where it was sent.
#[derive(Debug)]
pub struct MemoryHistory {
    inner: Mutex<HistoryState>,
}

#[derive(Debug)]
struct HistoryState {
    location: String,
    replacements: usize,
}

impl MemoryHistory {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            inner: Mutex::new(HistoryState {
                location: location.into(),
                replacements: 0,
            }),
        }
    }

    pub fn location(&self) -> String {
        self.lock().location.clone()
    }

    /// Number of `replace_state` calls so far.
    pub fn replacements(&self) -> usize {
        self.lock().replacements
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HistoryState> {
        // Poisoning can only come from a panicking reader; the state is still valid.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new(Routes::START_PAGE)
    }
}

impl Navigator for MemoryHistory {
    fn replace_state(&self, route: &str) {
        let mut state = self.lock();
        tracing::debug!(target: "session_fetch::session", from = %state.location, to = %route, "replacing location");
        state.location = route.to_string();
        state.replacements += 1;
    }
}
