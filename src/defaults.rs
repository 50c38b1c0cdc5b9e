//! Default values shared by configuration and the request builder.

pub mod http {
    use std::time::Duration;

    /// Default request timeout.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

    /// Default connect timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Default user agent.
    pub const USER_AGENT: &str = concat!("session-fetch/", env!("CARGO_PKG_VERSION"));

    /// Marker header identifying requests issued by the web client.
    pub const REQUESTED_WITH_HEADER: &str = "x-requested-with";
    pub const REQUESTED_WITH_VALUE: &str = "XMLHttpRequest";

    /// Basic auth password paired with a session id.
    pub const SESSION_AUTH_PASSWORD: &str = "session";
}

pub mod env {
    pub const TIMEOUT_SECS: &str = "SESSION_FETCH_TIMEOUT_SECS";
    pub const START_PAGE: &str = "SESSION_FETCH_START_PAGE";
}
