//! Request execution: the per-request builder, the top-level `fetch` entry
//! point and the HTTP plumbing underneath them.

pub mod builder;
pub mod fetch;
pub mod http;

pub use builder::{Builder, PreparedRequest, normalize_url};
pub use fetch::{Fetcher, fetch};
