//! session-fetch
//!
//! Session-aware JSON requests on top of `reqwest`.
//!
//! A request carries the current session as HTTP Basic credentials, sends and
//! accepts JSON, and maps the outcome onto the session lifecycle: a 401 logs
//! the session out, a 403 sends the user back to the start page, and the
//! server's reachability is reported after every request. A request issued
//! while logged out waits for the next login before it is sent.
//!
//! ```rust,ignore
//! use session_fetch::{FetchContext, InMemorySession, Method, fetch};
//! use std::sync::Arc;
//!
//! let session = Arc::new(InMemorySession::logged_in("session-id"));
//! let ctx = FetchContext::builder().session(session).build()?;
//! let system: serde_json::Value = fetch(&ctx, Method::GET, "http://localhost:9000/api/system", None).await?;
//! ```
#![deny(unsafe_code)]

pub mod availability;
pub mod context;
pub mod defaults;
pub mod error;
pub mod execution;
pub mod navigation;
pub mod session;
pub mod telemetry;
pub mod types;

pub use availability::{Availability, AvailabilityTracker, ServerAvailability};
pub use context::{FetchContext, FetchContextBuilder};
pub use error::{Additional, FetchError};
pub use execution::http::interceptor::{HttpInterceptor, HttpRequestContext, LoggingInterceptor};
pub use execution::{Builder, Fetcher, PreparedRequest, fetch};
pub use navigation::{MemoryHistory, Navigator, Routes};
pub use reqwest::Method;
pub use session::{InMemorySession, SessionActions, SessionId, SessionStore};
pub use types::{FetchConfig, FetchConfigBuilder};
