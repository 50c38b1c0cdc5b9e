//! Core error types.

use reqwest::header::HeaderMap;
use thiserror::Error;

/// Message used when neither the caller nor the underlying error provide one.
pub const UNDEFINED_ERROR: &str = "Undefined error.";

/// Details of what went wrong underneath a [`FetchError`].
#[derive(Debug, Clone)]
pub enum Additional {
    /// The server answered with a non-success status.
    Response {
        status: u16,
        status_text: String,
        headers: HeaderMap,
        /// Parsed JSON body, when the body was JSON.
        body: Option<serde_json::Value>,
        /// Raw body text.
        raw: String,
    },
    /// The request never produced an HTTP status (connect failure, timeout, ...).
    Transport {
        message: String,
        timeout: bool,
        connect: bool,
    },
    /// A success response whose body could not be decoded.
    Decode {
        status: u16,
        message: String,
        raw: String,
    },
    /// Invalid header, proxy or client setup.
    Configuration(String),
    /// The login notification source closed while a request was waiting on it.
    LoginUnavailable,
}

impl Additional {
    /// Build transport details from a message.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            timeout: false,
            connect: false,
        }
    }

    /// Build configuration details from a message.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// HTTP status attached to these details, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Response { status, .. } | Self::Decode { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The details' own message, used when no explicit message was given.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Response { status_text, .. } => self
                .body_message()
                .or((!status_text.is_empty()).then_some(status_text.as_str())),
            Self::Transport { message, .. }
            | Self::Decode { message, .. }
            | Self::Configuration(message) => Some(message.as_str()),
            Self::LoginUnavailable => Some("Login notifications are no longer available"),
        }
    }

    /// The `message` field of a JSON error body, if the server sent one.
    pub fn body_message(&self) -> Option<&str> {
        match self {
            Self::Response {
                body: Some(body), ..
            } => body.get("message").and_then(|m| m.as_str()),
            _ => None,
        }
    }
}

/// The single error kind returned by every request.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct FetchError {
    message: String,
    additional: Additional,
}

impl FetchError {
    /// Create an error and log it.
    ///
    /// The message falls back to the details' own message and finally to
    /// [`UNDEFINED_ERROR`].
    pub fn new(message: Option<&str>, additional: Additional) -> Self {
        let message = message
            .filter(|m| !m.is_empty())
            .or_else(|| additional.message())
            .unwrap_or(UNDEFINED_ERROR)
            .to_string();

        tracing::error!(
            target: "session_fetch::http",
            status = ?additional.status(),
            "There was an error fetching a resource: {}. Additional information: {}",
            message,
            additional.body_message().unwrap_or("Not available"),
        );

        Self {
            message,
            additional,
        }
    }

    /// Error for a non-success HTTP response.
    pub fn from_response(
        status: u16,
        status_text: impl Into<String>,
        headers: HeaderMap,
        raw: String,
    ) -> Self {
        let status_text = status_text.into();
        let body = serde_json::from_str::<serde_json::Value>(&raw).ok();
        let message = status_text.clone();
        Self::new(
            Some(&message),
            Additional::Response {
                status,
                status_text,
                headers,
                body,
                raw,
            },
        )
    }

    /// Error for a configuration problem.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(None, Additional::configuration(message))
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn additional(&self) -> &Additional {
        &self.additional
    }

    /// HTTP status of the failed response, if one was received.
    pub fn status(&self) -> Option<u16> {
        self.additional.status()
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    pub fn is_forbidden(&self) -> bool {
        self.status() == Some(403)
    }

    /// True when the server could not be reached at all.
    pub fn is_network_error(&self) -> bool {
        matches!(self.additional, Additional::Transport { .. })
    }

    /// The `message` field of the server's JSON error body, if present.
    pub fn body_message(&self) -> Option<&str> {
        self.additional.body_message()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    fn explicit_message_wins() {
        let err = FetchError::new(Some("Bad Gateway"), Additional::transport("io"));
        assert_eq!(err.message(), "Bad Gateway");
        assert_eq!(err.to_string(), "Bad Gateway");
    }

    #[test]
    fn empty_message_falls_back_to_additional() {
        let err = FetchError::new(Some(""), Additional::transport("connection refused"));
        assert_eq!(err.message(), "connection refused");
    }

    #[test]
    fn response_message_prefers_body_message() {
        let additional = Additional::Response {
            status: 400,
            status_text: "Bad Request".into(),
            headers: HeaderMap::new(),
            body: Some(serde_json::json!({"message": "Invalid stream id"})),
            raw: String::new(),
        };
        let err = FetchError::new(None, additional);
        assert_eq!(err.message(), "Invalid stream id");
        assert_eq!(err.body_message(), Some("Invalid stream id"));
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn undefined_error_is_last_resort() {
        let additional = Additional::Response {
            status: 599,
            status_text: String::new(),
            headers: HeaderMap::new(),
            body: None,
            raw: String::new(),
        };
        let err = FetchError::new(None, additional);
        assert_eq!(err.message(), UNDEFINED_ERROR);
    }

    #[test]
    fn from_response_parses_json_body() {
        let err = FetchError::from_response(
            401,
            "Unauthorized",
            HeaderMap::new(),
            r#"{"type":"ApiError","message":"session expired"}"#.to_string(),
        );
        assert_eq!(err.message(), "Unauthorized");
        assert!(err.is_unauthorized());
        assert!(!err.is_forbidden());
        assert!(!err.is_network_error());
        assert_eq!(err.body_message(), Some("session expired"));
    }

    #[test]
    fn transport_errors_have_no_status() {
        let err = FetchError::new(None, Additional::transport("dns failure"));
        assert_eq!(err.status(), None);
        assert!(err.is_network_error());
    }

    #[traced_test]
    #[test]
    fn construction_is_logged_with_additional_information() {
        let _ = FetchError::from_response(
            500,
            "Internal Server Error",
            HeaderMap::new(),
            r#"{"message":"index failure"}"#.to_string(),
        );
        assert!(logs_contain(
            "There was an error fetching a resource: Internal Server Error"
        ));
        assert!(logs_contain("Additional information: index failure"));
    }

    #[traced_test]
    #[test]
    fn missing_body_message_is_logged_as_not_available() {
        let _ = FetchError::new(None, Additional::transport("timed out"));
        assert!(logs_contain("Additional information: Not available"));
    }
}
