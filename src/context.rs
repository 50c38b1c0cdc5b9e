//! Collaborators shared by every request.

use crate::availability::{AvailabilityTracker, ServerAvailability};
use crate::error::FetchError;
use crate::execution::http::client::build_http_client;
use crate::execution::http::interceptor::HttpInterceptor;
use crate::navigation::{MemoryHistory, Navigator};
use crate::session::{InMemorySession, SessionActions, SessionStore};
use crate::types::FetchConfig;
use std::fmt;
use std::sync::Arc;

/// HTTP client, configuration and the session/availability/navigation seams.
///
/// Cheap to clone; every request carries its own clone.
#[derive(Clone)]
pub struct FetchContext {
    http_client: reqwest::Client,
    config: Arc<FetchConfig>,
    session_store: Arc<dyn SessionStore>,
    session_actions: Arc<dyn SessionActions>,
    availability: Arc<dyn ServerAvailability>,
    navigator: Arc<dyn Navigator>,
    interceptors: Vec<Arc<dyn HttpInterceptor>>,
}

impl FetchContext {
    pub fn builder() -> FetchContextBuilder {
        FetchContextBuilder::default()
    }

    pub fn http_client(&self) -> &reqwest::Client {
        &self.http_client
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    pub fn session_store(&self) -> &dyn SessionStore {
        self.session_store.as_ref()
    }

    pub fn session_actions(&self) -> &dyn SessionActions {
        self.session_actions.as_ref()
    }

    pub fn availability(&self) -> &dyn ServerAvailability {
        self.availability.as_ref()
    }

    pub fn navigator(&self) -> &dyn Navigator {
        self.navigator.as_ref()
    }

    pub fn interceptors(&self) -> &[Arc<dyn HttpInterceptor>] {
        &self.interceptors
    }
}

impl fmt::Debug for FetchContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchContext")
            .field("config", &self.config)
            .field("logged_in", &self.session_store.is_logged_in())
            .field("interceptors", &self.interceptors.len())
            .finish()
    }
}

/// Builder for [`FetchContext`]. Unset collaborators fall back to the
/// in-memory implementations.
#[derive(Default)]
pub struct FetchContextBuilder {
    config: Option<FetchConfig>,
    http_client: Option<reqwest::Client>,
    session_store: Option<Arc<dyn SessionStore>>,
    session_actions: Option<Arc<dyn SessionActions>>,
    availability: Option<Arc<dyn ServerAvailability>>,
    navigator: Option<Arc<dyn Navigator>>,
    interceptors: Vec<Arc<dyn HttpInterceptor>>,
}

impl FetchContextBuilder {
    pub fn config(mut self, config: FetchConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Use a preconfigured client instead of building one from the config.
    ///
    /// The client is used as-is: timeouts, proxy and the `X-Requested-With`
    /// marker come from the client, not from [`FetchConfig`]. Build it with
    /// [`build_http_client`] to keep them.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Use one object as both session store and session actions.
    pub fn session<S>(mut self, session: Arc<S>) -> Self
    where
        S: SessionStore + SessionActions + 'static,
    {
        self.session_store = Some(session.clone());
        self.session_actions = Some(session);
        self
    }

    pub fn session_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.session_store = Some(store);
        self
    }

    pub fn session_actions(mut self, actions: Arc<dyn SessionActions>) -> Self {
        self.session_actions = Some(actions);
        self
    }

    pub fn availability(mut self, availability: Arc<dyn ServerAvailability>) -> Self {
        self.availability = Some(availability);
        self
    }

    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    /// Append an interceptor. Order is preserved.
    pub fn interceptor(mut self, interceptor: Arc<dyn HttpInterceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    pub fn build(self) -> Result<FetchContext, FetchError> {
        let config = self.config.unwrap_or_default();
        let http_client = match self.http_client {
            Some(client) => client,
            None => build_http_client(&config)?,
        };

        let (session_store, session_actions) = match (self.session_store, self.session_actions) {
            (Some(store), Some(actions)) => (store, actions),
            (None, None) => {
                let session = Arc::new(InMemorySession::new());
                (
                    session.clone() as Arc<dyn SessionStore>,
                    session as Arc<dyn SessionActions>,
                )
            }
            _ => {
                return Err(FetchError::configuration(
                    "session store and session actions must be configured together",
                ));
            }
        };

        Ok(FetchContext {
            http_client,
            config: Arc::new(config),
            session_store,
            session_actions,
            availability: self
                .availability
                .unwrap_or_else(|| Arc::new(AvailabilityTracker::new())),
            navigator: self
                .navigator
                .unwrap_or_else(|| Arc::new(MemoryHistory::default())),
            interceptors: self.interceptors,
        })
    }
}
