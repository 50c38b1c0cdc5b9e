//! Fetch configuration types.
//!
//! This module defines `FetchConfig` and its builder, used to configure the
//! HTTP client and the session side effects of every request.

use crate::defaults;
use crate::navigation::Routes;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Fetch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Request timeout, in (fractional) seconds when serialized
    #[serde(with = "duration_secs_serde")]
    pub timeout: Option<Duration>,
    /// Connection timeout
    #[serde(with = "duration_secs_serde")]
    pub connect_timeout: Option<Duration>,
    /// Headers sent with every request
    pub headers: HashMap<String, String>,
    /// Proxy settings
    pub proxy: Option<String>,
    /// User agent
    pub user_agent: Option<String>,
    /// Route a logged-in user is sent to after a 403.
    pub start_page: String,
}

/// Builder for `FetchConfig`
///
/// Timeouts use a nested `Option`: untouched means "use the default",
/// `Some(None)` means "no timeout".
#[derive(Debug, Clone, Default)]
pub struct FetchConfigBuilder {
    timeout: Option<Option<Duration>>,
    connect_timeout: Option<Option<Duration>>,
    headers: HashMap<String, String>,
    proxy: Option<String>,
    user_agent: Option<String>,
    start_page: Option<String>,
}

impl FetchConfigBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the request timeout; `None` disables it.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = Some(timeout);
        self
    }
    /// Set the connect timeout; `None` disables it.
    pub fn connect_timeout(mut self, connect_timeout: Option<Duration>) -> Self {
        self.connect_timeout = Some(connect_timeout);
        self
    }
    /// Disable both timeouts.
    pub fn no_timeout(self) -> Self {
        self.timeout(None).connect_timeout(None)
    }
    pub fn user_agent<S: Into<String>>(mut self, user_agent: Option<S>) -> Self {
        self.user_agent = user_agent.map(|s| s.into());
        self
    }
    pub fn proxy<S: Into<String>>(mut self, proxy: Option<S>) -> Self {
        self.proxy = proxy.map(|s| s.into());
        self
    }
    pub fn header<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }
    pub fn headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers.extend(headers);
        self
    }
    pub fn start_page<S: Into<String>>(mut self, route: S) -> Self {
        self.start_page = Some(route.into());
        self
    }

    /// Build the configuration.
    ///
    /// Anything left untouched falls back to [`FetchConfig::default`], which
    /// honours the environment.
    pub fn build(self) -> FetchConfig {
        let fallback = FetchConfig::default();
        FetchConfig {
            timeout: self.timeout.unwrap_or(fallback.timeout),
            connect_timeout: self.connect_timeout.unwrap_or(fallback.connect_timeout),
            headers: self.headers,
            proxy: self.proxy,
            user_agent: self.user_agent.or(fallback.user_agent),
            start_page: self.start_page.unwrap_or(fallback.start_page),
        }
    }
}

impl FetchConfig {
    /// Returns a builder for constructing `FetchConfig`
    pub fn builder() -> FetchConfigBuilder {
        FetchConfigBuilder::new()
    }
}

mod duration_secs_serde {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => d.as_secs_f64().serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs: Option<f64> = Option::deserialize(deserializer)?;
        secs.map(|s| {
            Duration::try_from_secs_f64(s)
                .map_err(|e| D::Error::custom(format!("invalid timeout {s}: {e}")))
        })
        .transpose()
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        let timeout = std::env::var(defaults::env::TIMEOUT_SECS)
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults::http::REQUEST_TIMEOUT);
        let start_page = std::env::var(defaults::env::START_PAGE)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| Routes::START_PAGE.to_string());
        Self {
            timeout: Some(timeout),
            connect_timeout: Some(defaults::http::CONNECT_TIMEOUT),
            headers: HashMap::new(),
            proxy: None,
            user_agent: Some(defaults::http::USER_AGENT.to_string()),
            start_page,
        }
    }
}
