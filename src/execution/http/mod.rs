//! HTTP Utilities
//!
//! - HTTP client construction
//! - HTTP interceptors

pub mod client;
pub mod interceptor;

pub use client::*;
pub use interceptor::*;
