//! In-memory session store.

use super::{SessionActions, SessionId, SessionStore};
use crate::error::{Additional, FetchError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::watch;

/// Session state held in a `watch` channel.
///
/// `login` publishes a credential and wakes every request deferred on
/// [`SessionActions::login_completed`]; `logout` clears it.
#[derive(Debug)]
pub struct InMemorySession {
    state: watch::Sender<Option<SessionId>>,
    logouts: AtomicUsize,
}

impl InMemorySession {
    /// A logged-out session.
    pub fn new() -> Self {
        let (state, _) = watch::channel(None);
        Self {
            state,
            logouts: AtomicUsize::new(0),
        }
    }

    /// A session that is already logged in.
    pub fn logged_in(session_id: impl Into<SessionId>) -> Self {
        let session = Self::new();
        session.state.send_replace(Some(session_id.into()));
        session
    }

    /// Complete a login.
    pub fn login(&self, session_id: impl Into<SessionId>) {
        self.state.send_replace(Some(session_id.into()));
        tracing::info!(target: "session_fetch::session", "login completed");
    }

    /// Number of sessions ended through [`SessionActions::logout`].
    pub fn logout_count(&self) -> usize {
        self.logouts.load(Ordering::SeqCst)
    }

    /// Observe session changes.
    pub fn subscribe(&self) -> watch::Receiver<Option<SessionId>> {
        self.state.subscribe()
    }
}

impl Default for InMemorySession {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for InMemorySession {
    fn session_id(&self) -> Option<SessionId> {
        self.state.borrow().clone()
    }
}

#[async_trait]
impl SessionActions for InMemorySession {
    async fn logout(&self, session_id: &SessionId) {
        let cleared = self.state.send_if_modified(|current| {
            if current.as_ref() == Some(session_id) {
                *current = None;
                true
            } else {
                false
            }
        });
        self.logouts.fetch_add(1, Ordering::SeqCst);
        if cleared {
            tracing::info!(target: "session_fetch::session", "session ended");
        } else {
            tracing::debug!(target: "session_fetch::session", "logout for a session that is no longer current");
        }
    }

    async fn login_completed(&self) -> Result<(), FetchError> {
        let mut rx = self.state.subscribe();
        rx.wait_for(Option::is_some)
            .await
            .map(|_| ())
            .map_err(|_| FetchError::new(None, Additional::LoginUnavailable))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn starts_logged_out() {
        let session = InMemorySession::new();
        assert!(!session.is_logged_in());
        assert!(session.session_id().is_none());
    }

    #[tokio::test]
    async fn logout_clears_matching_session() {
        let session = InMemorySession::logged_in("abc");
        session.logout(&SessionId::from("abc")).await;
        assert!(!session.is_logged_in());
        assert_eq!(session.logout_count(), 1);
    }

    #[tokio::test]
    async fn logout_of_stale_session_keeps_current_one() {
        let session = InMemorySession::logged_in("new");
        session.logout(&SessionId::from("old")).await;
        assert_eq!(session.session_id(), Some(SessionId::from("new")));
    }

    #[tokio::test]
    async fn login_completed_resolves_immediately_when_logged_in() {
        let session = InMemorySession::logged_in("abc");
        tokio::time::timeout(Duration::from_millis(100), session.login_completed())
            .await
            .expect("should not wait")
            .unwrap();
    }

    #[tokio::test]
    async fn login_completed_waits_for_login() {
        let session = Arc::new(InMemorySession::new());
        let waiter = {
            let session = session.clone();
            tokio::spawn(async move { session.login_completed().await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        session.login("abc");
        waiter.await.unwrap().unwrap();
    }
}
