//! Type Conversions for FetchError
//!
//! From trait implementations for the transport and header errors the
//! request pipeline runs into.

use super::types::{Additional, FetchError};

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            return Self::new(None, Additional::configuration(err.to_string()));
        }
        Self::new(
            None,
            Additional::Transport {
                message: err.to_string(),
                timeout: err.is_timeout(),
                connect: err.is_connect(),
            },
        )
    }
}

impl From<reqwest::header::InvalidHeaderName> for FetchError {
    fn from(err: reqwest::header::InvalidHeaderName) -> Self {
        Self::configuration(format!("Invalid header name: {err}"))
    }
}

impl From<reqwest::header::InvalidHeaderValue> for FetchError {
    fn from(err: reqwest::header::InvalidHeaderValue) -> Self {
        Self::configuration(format!("Invalid header value: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_header_name_is_a_configuration_error() {
        let err = reqwest::header::HeaderName::from_bytes(b"bad header").unwrap_err();
        let fetch_err: FetchError = err.into();
        assert!(matches!(
            fetch_err.additional(),
            Additional::Configuration(_)
        ));
    }

    #[test]
    fn invalid_header_value_is_a_configuration_error() {
        let err = reqwest::header::HeaderValue::from_str("line\nbreak").unwrap_err();
        let fetch_err: FetchError = err.into();
        assert!(fetch_err.message().starts_with("Invalid header value"));
    }

    #[tokio::test]
    async fn connect_failure_is_a_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let err = reqwest::Client::new()
            .get(format!("http://127.0.0.1:{port}/"))
            .send()
            .await
            .unwrap_err();
        let fetch_err: FetchError = err.into();
        assert!(fetch_err.is_network_error());
        assert_eq!(fetch_err.status(), None);
    }
}
