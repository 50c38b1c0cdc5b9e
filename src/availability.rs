//! Server availability reporting.
//!
//! Every successful response reports the server as reachable, every failure
//! that never produced an HTTP status reports it as unreachable.

use crate::error::FetchError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;

/// Sink for reachability signals.
pub trait ServerAvailability: Send + Sync {
    fn report_success(&self);
    fn report_error(&self, error: &FetchError);
}

/// Last known reachability of the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Availability {
    Unknown,
    Available { since: DateTime<Utc> },
    Unavailable { reason: String, since: DateTime<Utc> },
}

impl Availability {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available { .. })
    }
}

/// [`ServerAvailability`] that keeps the latest state in a `watch` channel.
///
/// Transitions are logged once; repeated reports of the same state are not
/// re-published.
#[derive(Debug)]
pub struct AvailabilityTracker {
    state: watch::Sender<Availability>,
}

impl AvailabilityTracker {
    pub fn new() -> Self {
        let (state, _) = watch::channel(Availability::Unknown);
        Self { state }
    }

    pub fn current(&self) -> Availability {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Availability> {
        self.state.subscribe()
    }
}

impl Default for AvailabilityTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerAvailability for AvailabilityTracker {
    fn report_success(&self) {
        self.state.send_if_modified(|state| {
            if state.is_available() {
                return false;
            }
            if matches!(state, Availability::Unavailable { .. }) {
                tracing::info!(target: "session_fetch::http", "server is reachable again");
            }
            *state = Availability::Available { since: Utc::now() };
            true
        });
    }

    fn report_error(&self, error: &FetchError) {
        self.state.send_if_modified(|state| {
            if let Availability::Unavailable { reason, .. } = state {
                // Keep the first outage start, refresh the reason.
                if reason.as_str() != error.message() {
                    *reason = error.message().to_string();
                    return true;
                }
                return false;
            }
            tracing::warn!(target: "session_fetch::http", reason = %error, "server is unreachable");
            *state = Availability::Unavailable {
                reason: error.message().to_string(),
                since: Utc::now(),
            };
            true
        });
    }
}
