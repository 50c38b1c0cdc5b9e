//! HTTP client construction
//!
//! Every request goes through one `reqwest::Client` per [`FetchContext`]. The
//! client carries what is the same for every call: timeouts, proxy, user
//! agent, the `X-Requested-With` marker and the configured extra headers.
//!
//! [`FetchContext`]: crate::context::FetchContext

use crate::defaults;
use crate::error::FetchError;
use crate::types::FetchConfig;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

/// Build the shared client for a [`FetchConfig`].
pub fn build_http_client(config: &FetchConfig) -> Result<reqwest::Client, FetchError> {
    let mut builder = reqwest::Client::builder().default_headers(default_headers(config)?);

    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }
    if let Some(connect_timeout) = config.connect_timeout {
        builder = builder.connect_timeout(connect_timeout);
    }
    if let Some(user_agent) = &config.user_agent {
        builder = builder.user_agent(user_agent);
    }
    if let Some(proxy_url) = &config.proxy {
        let proxy = reqwest::Proxy::all(proxy_url).map_err(|e| {
            FetchError::configuration(format!("Proxy '{proxy_url}' is not usable: {e}"))
        })?;
        builder = builder.proxy(proxy);
    }

    builder.build().map_err(|e| {
        FetchError::configuration(format!("HTTP client rejected the fetch configuration: {e}"))
    })
}

/// Headers attached to every request: the XMLHttpRequest marker first, then
/// the configured headers, which may override it.
fn default_headers(config: &FetchConfig) -> Result<HeaderMap, FetchError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static(defaults::http::REQUESTED_WITH_HEADER),
        HeaderValue::from_static(defaults::http::REQUESTED_WITH_VALUE),
    );
    for (name, value) in &config.headers {
        headers.insert(
            HeaderName::from_bytes(name.as_bytes())?,
            HeaderValue::from_str(value)?,
        );
    }
    Ok(headers)
}
