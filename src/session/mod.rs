//! Session seams.
//!
//! The request pipeline never owns login state. It asks a [`SessionStore`]
//! for the current credential and drives lifecycle changes through
//! [`SessionActions`]. [`InMemorySession`] implements both for standalone use
//! and tests.

use crate::error::FetchError;
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use std::fmt;

mod memory;

pub use memory::InMemorySession;

/// Opaque session credential. Never printed by `Debug`.
#[derive(Clone)]
pub struct SessionId(SecretString);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(SecretString::from(id.into()))
    }

    /// Returns the raw credential for placing it on the wire.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionId([REDACTED])")
    }
}

impl PartialEq for SessionId {
    fn eq(&self, other: &Self) -> bool {
        self.expose() == other.expose()
    }
}

impl Eq for SessionId {}

impl From<&str> for SessionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for SessionId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

/// Read access to the current login state.
pub trait SessionStore: Send + Sync {
    /// Current session credential, `None` when logged out.
    fn session_id(&self) -> Option<SessionId>;

    fn is_logged_in(&self) -> bool {
        self.session_id().is_some()
    }
}

/// Session lifecycle actions triggered by the request pipeline.
#[async_trait]
pub trait SessionActions: Send + Sync {
    /// End the given session. Called when the server rejects it with 401.
    async fn logout(&self, session_id: &SessionId);

    /// Resolves once the next login completes.
    ///
    /// Resolves immediately when a session is already active, so a caller that
    /// checked [`SessionStore::is_logged_in`] first cannot miss a login that
    /// raced with it.
    async fn login_completed(&self) -> Result<(), FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_the_credential() {
        let id = SessionId::new("c0ffee");
        assert_eq!(format!("{id:?}"), "SessionId([REDACTED])");
        assert_eq!(id.expose(), "c0ffee");
    }

    #[test]
    fn equality_compares_credentials() {
        assert_eq!(SessionId::from("a"), SessionId::from("a".to_string()));
        assert_ne!(SessionId::from("a"), SessionId::from("b"));
    }
}
