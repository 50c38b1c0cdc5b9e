//! HTTP Interceptor interfaces
//!
//! Interceptors can observe and tweak request builders before send, observe
//! successful responses and be notified of errors. The hooks are best-effort
//! and should avoid expensive work.

use crate::error::FetchError;
use reqwest::Method;
use reqwest::header::HeaderMap;

/// Context passed to interceptors describing the request.
#[derive(Clone, Debug)]
pub struct HttpRequestContext {
    pub request_id: String,
    pub method: Method,
    pub url: String,
    /// Whether a session credential is attached.
    pub authenticated: bool,
}

/// Generate a unique request id.
pub fn generate_request_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// HTTP interceptor trait
pub trait HttpInterceptor: Send + Sync {
    /// Called before sending a request. Interceptors may add headers or modify
    /// attributes on the request builder. Return the (possibly modified)
    /// builder or an error to short-circuit the request.
    fn on_before_send(
        &self,
        _ctx: &HttpRequestContext,
        builder: reqwest::RequestBuilder,
        _body: Option<&serde_json::Value>,
        _headers: &HeaderMap,
    ) -> Result<reqwest::RequestBuilder, FetchError> {
        Ok(builder)
    }

    /// Called after a successful response is received.
    fn on_response(
        &self,
        _ctx: &HttpRequestContext,
        _response: &reqwest::Response,
    ) -> Result<(), FetchError> {
        Ok(())
    }

    /// Called when a request fails.
    fn on_error(&self, _ctx: &HttpRequestContext, _error: &FetchError) {}
}

/// A simple logging interceptor backed by `tracing`. Never logs credentials.
#[derive(Clone, Default)]
pub struct LoggingInterceptor;

impl HttpInterceptor for LoggingInterceptor {
    fn on_before_send(
        &self,
        ctx: &HttpRequestContext,
        builder: reqwest::RequestBuilder,
        _body: Option<&serde_json::Value>,
        _headers: &HeaderMap,
    ) -> Result<reqwest::RequestBuilder, FetchError> {
        tracing::debug!(target: "session_fetch::http", request_id=%ctx.request_id, method=%ctx.method, url=%ctx.url, authenticated=%ctx.authenticated, "sending request");
        Ok(builder)
    }

    fn on_response(
        &self,
        ctx: &HttpRequestContext,
        response: &reqwest::Response,
    ) -> Result<(), FetchError> {
        tracing::debug!(target: "session_fetch::http", request_id=%ctx.request_id, url=%ctx.url, status=%response.status().as_u16(), "response received");
        Ok(())
    }

    fn on_error(&self, ctx: &HttpRequestContext, error: &FetchError) {
        tracing::debug!(target: "session_fetch::http", request_id=%ctx.request_id, url=%ctx.url, status=?error.status(), err=%error, "request error");
    }
}
