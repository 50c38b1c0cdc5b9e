//! Request builder.
//!
//! Wraps a single `reqwest` request: normalizes the URL, attaches the session
//! credential and the JSON body, and on completion applies the session side
//! effects:
//!
//! - 2xx: report the server as reachable and decode the body
//! - 401 while logged in: log the session out
//! - 403 while logged in: replace the location with the start page
//! - no HTTP status at all: report the server as unreachable

use crate::context::FetchContext;
use crate::defaults;
use crate::error::{Additional, FetchError};
use crate::execution::http::interceptor::{HttpRequestContext, generate_request_id};
use crate::session::SessionId;
use regex::Regex;
use reqwest::Method;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderValue};
use serde::de::DeserializeOwned;
use std::sync::LazyLock;

static DOUBLE_SLASH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^:])//").expect("static regex"));

/// Collapse the first `//` not preceded by `:` into `/`.
///
/// Only the first occurrence is rewritten, so `http://host//api` becomes
/// `http://host/api` while the scheme separator is left alone.
pub fn normalize_url(url: &str) -> String {
    DOUBLE_SLASH.replace(url, "$1/").into_owned()
}

/// Builder for a single request.
pub struct Builder {
    ctx: FetchContext,
    method: Method,
    url: String,
    request: reqwest::RequestBuilder,
    session: Option<SessionId>,
    body: Option<serde_json::Value>,
}

impl Builder {
    pub fn new(ctx: &FetchContext, method: Method, url: &str) -> Self {
        let url = normalize_url(url);
        let request = ctx.http_client().request(method.clone(), &url);
        Self {
            ctx: ctx.clone(),
            method,
            url,
            request,
            session: None,
            body: None,
        }
    }

    /// Attach the current session credential, if a session is active.
    pub fn authenticated(self) -> Self {
        match self.ctx.session_store().session_id() {
            Some(session_id) => self.session(session_id),
            None => self,
        }
    }

    /// Attach `session_id` as HTTP Basic credentials.
    pub fn session(mut self, session_id: SessionId) -> Self {
        self.request = self.request.basic_auth(
            session_id.expose(),
            Some(defaults::http::SESSION_AUTH_PASSWORD),
        );
        self.session = Some(session_id);
        self
    }

    /// Set a request header. Invalid names or values fail the request when it
    /// is sent.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.request = self.request.header(name, value);
        self
    }

    /// Send `body` as JSON and accept JSON back.
    pub fn json(mut self, body: Option<serde_json::Value>) -> Self {
        self.request = self
            .request
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .header(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(body) = &body {
            self.request = self.request.body(body.to_string());
        }
        self.body = body;
        self
    }

    pub fn build(self) -> PreparedRequest {
        let request_ctx = HttpRequestContext {
            request_id: generate_request_id(),
            method: self.method,
            url: self.url,
            authenticated: self.session.is_some(),
        };
        PreparedRequest {
            ctx: self.ctx,
            request_ctx,
            request: self.request,
            body: self.body,
        }
    }
}

/// A request ready to be sent exactly once.
pub struct PreparedRequest {
    ctx: FetchContext,
    request_ctx: HttpRequestContext,
    request: reqwest::RequestBuilder,
    body: Option<serde_json::Value>,
}

impl PreparedRequest {
    pub fn context(&self) -> &HttpRequestContext {
        &self.request_ctx
    }

    /// Send the request and decode a successful JSON body into `T`.
    ///
    /// An empty success body decodes as JSON `null`.
    pub async fn send<T: DeserializeOwned>(self) -> Result<T, FetchError> {
        let (client, request) = self.request.build_split();
        let request = match request {
            Ok(request) => request,
            Err(e) => return Err(handle_failure(&self.ctx, &self.request_ctx, e.into()).await),
        };
        let headers = request.headers().clone();

        let mut rb = reqwest::RequestBuilder::from_parts(client, request);
        for interceptor in self.ctx.interceptors() {
            rb = match interceptor.on_before_send(&self.request_ctx, rb, self.body.as_ref(), &headers)
            {
                Ok(rb) => rb,
                Err(e) => return Err(handle_failure(&self.ctx, &self.request_ctx, e).await),
            };
        }

        let resp = match rb.send().await {
            Ok(resp) => resp,
            Err(e) => return Err(handle_failure(&self.ctx, &self.request_ctx, e.into()).await),
        };

        let status = resp.status();
        if !status.is_success() {
            let response_headers = resp.headers().clone();
            let text = resp.text().await.unwrap_or_default();
            let error = FetchError::from_response(
                status.as_u16(),
                status.canonical_reason().unwrap_or_default(),
                response_headers,
                text,
            );
            return Err(handle_failure(&self.ctx, &self.request_ctx, error).await);
        }

        for interceptor in self.ctx.interceptors() {
            if let Err(e) = interceptor.on_response(&self.request_ctx, &resp) {
                return Err(handle_failure(&self.ctx, &self.request_ctx, e).await);
            }
        }
        self.ctx.availability().report_success();

        let text = match resp.text().await {
            Ok(text) => text,
            Err(e) => return Err(handle_failure(&self.ctx, &self.request_ctx, e.into()).await),
        };
        decode_body(status.as_u16(), text).map_err(|e| {
            for interceptor in self.ctx.interceptors() {
                interceptor.on_error(&self.request_ctx, &e);
            }
            e
        })
    }
}

fn decode_body<T: DeserializeOwned>(status: u16, text: String) -> Result<T, FetchError> {
    let parsed = if text.trim().is_empty() {
        serde_json::from_value(serde_json::Value::Null)
    } else {
        serde_json::from_str(&text)
    };
    parsed.map_err(|e| {
        FetchError::new(
            None,
            Additional::Decode {
                status,
                message: format!("Failed to decode response body: {e}"),
                raw: text,
            },
        )
    })
}

/// Apply the failure side effects and hand the error back.
///
/// Side effects are best-effort: they run before the error is returned but
/// their own outcome is not reported.
async fn handle_failure(
    ctx: &FetchContext,
    request_ctx: &HttpRequestContext,
    error: FetchError,
) -> FetchError {
    let store = ctx.session_store();

    if error.is_unauthorized()
        && store.is_logged_in()
        && let Some(session_id) = store.session_id()
    {
        tracing::warn!(target: "session_fetch::session", request_id=%request_ctx.request_id, url=%request_ctx.url, "session rejected with 401, logging out");
        ctx.session_actions().logout(&session_id).await;
    }

    // Logged in but not allowed to access this API
    if error.is_forbidden() && store.is_logged_in() {
        let start_page = &ctx.config().start_page;
        tracing::warn!(target: "session_fetch::session", request_id=%request_ctx.request_id, url=%request_ctx.url, to=%start_page, "access forbidden, redirecting");
        ctx.navigator().replace_state(start_page);
    }

    if error.is_network_error() {
        ctx.availability().report_error(&error);
    }

    for interceptor in ctx.interceptors() {
        interceptor.on_error(request_ctx, &error);
    }
    error
}
