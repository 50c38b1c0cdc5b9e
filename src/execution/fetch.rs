//! Top-level request entry points.

use crate::context::FetchContext;
use crate::error::FetchError;
use crate::execution::builder::Builder;
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Issue an authenticated JSON request.
///
/// With an active session the request is sent immediately. Otherwise it waits
/// for exactly one login-completed notification, then builds the request with
/// the fresh credential and sends it once.
pub async fn fetch<T: DeserializeOwned>(
    ctx: &FetchContext,
    method: Method,
    url: &str,
    body: Option<serde_json::Value>,
) -> Result<T, FetchError> {
    if !ctx.session_store().is_logged_in() {
        tracing::debug!(target: "session_fetch::http", %method, %url, "not logged in, deferring request until login completes");
        ctx.session_actions().login_completed().await?;
    }

    Builder::new(ctx, method, url)
        .authenticated()
        .json(body)
        .build()
        .send()
        .await
}

/// Owned handle over a [`FetchContext`] with per-verb helpers.
#[derive(Debug, Clone)]
pub struct Fetcher {
    ctx: FetchContext,
}

impl Fetcher {
    pub fn new(ctx: FetchContext) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &FetchContext {
        &self.ctx
    }

    pub async fn fetch<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        body: Option<serde_json::Value>,
    ) -> Result<T, FetchError> {
        fetch(&self.ctx, method, url, body).await
    }

    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        self.fetch(Method::GET, url, None).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        self.fetch(Method::DELETE, url, None).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T, FetchError> {
        self.fetch(Method::POST, url, Some(to_json(body)?)).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T, FetchError> {
        self.fetch(Method::PUT, url, Some(to_json(body)?)).await
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T, FetchError> {
        self.fetch(Method::PATCH, url, Some(to_json(body)?)).await
    }
}

fn to_json<B: Serialize + ?Sized>(body: &B) -> Result<serde_json::Value, FetchError> {
    serde_json::to_value(body)
        .map_err(|e| FetchError::configuration(format!("Failed to serialize request body: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{InMemorySession, SessionActions};
    use serde::Deserialize;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio_test::{assert_pending, assert_ready_ok};

    #[derive(Debug, Deserialize, PartialEq)]
    struct Stream {
        id: String,
        title: String,
    }

    fn context(session: Arc<InMemorySession>) -> FetchContext {
        FetchContext::builder().session(session).build().unwrap()
    }

    #[tokio::test]
    async fn logged_in_fetch_sends_immediately() {
        let mut server = mockito::Server::new_async().await;
        let m = server
            .mock("GET", "/api/streams/s1")
            .with_status(200)
            .with_body(r#"{"id":"s1","title":"All messages"}"#)
            .expect(1)
            .create_async()
            .await;

        let ctx = context(Arc::new(InMemorySession::logged_in("sid")));
        let url = format!("{}/api/streams/s1", server.url());
        let stream: Stream = fetch(&ctx, Method::GET, &url, None).await.unwrap();

        assert_eq!(
            stream,
            Stream {
                id: "s1".into(),
                title: "All messages".into()
            }
        );
        m.assert_async().await;
    }

    #[tokio::test]
    async fn logged_out_fetch_waits_for_login() {
        let mut server = mockito::Server::new_async().await;
        let m = server
            .mock("GET", "/api/system")
            // base64("late:session")
            .match_header("authorization", "Basic bGF0ZTpzZXNzaW9u")
            .with_status(200)
            .with_body(r#"{"ok":true}"#)
            .expect(1)
            .create_async()
            .await;

        let session = Arc::new(InMemorySession::new());
        let ctx = context(session.clone());
        let url = format!("{}/api/system", server.url());

        let mut pending = tokio_test::task::spawn(async {
            fetch::<serde_json::Value>(&ctx, Method::GET, &url, None).await
        });
        assert_pending!(pending.poll());

        session.login("late");
        assert!(pending.is_woken());

        let body = pending.await.unwrap();
        assert_eq!(body["ok"], true);
        m.assert_async().await;
    }

    #[tokio::test]
    async fn fetcher_posts_serialized_body() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/api/search")
            .match_body(mockito::Matcher::Json(
                serde_json::json!({"query": "level:3"}),
            ))
            .with_status(200)
            .with_body(r#"{"total":7}"#)
            .create_async()
            .await;

        let fetcher = Fetcher::new(context(Arc::new(InMemorySession::logged_in("sid"))));
        let mut query = HashMap::new();
        query.insert("query", "level:3");
        let result: serde_json::Value = fetcher
            .post(&format!("{}/api/search", server.url()), &query)
            .await
            .unwrap();
        assert_eq!(result["total"], 7);
    }

    #[tokio::test]
    async fn fetcher_delete_without_body() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("DELETE", "/api/streams/s1")
            .with_status(204)
            .create_async()
            .await;

        let fetcher = Fetcher::new(context(Arc::new(InMemorySession::logged_in("sid"))));
        let url = format!("{}/api/streams/s1", server.url());
        let _: () = fetcher.delete(&url).await.unwrap();
    }

    #[tokio::test]
    async fn ready_when_already_logged_in() {
        let session = Arc::new(InMemorySession::logged_in("sid"));
        let mut login = tokio_test::task::spawn(session.login_completed());
        assert_ready_ok!(login.poll());
    }
}
