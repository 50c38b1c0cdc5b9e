//! Error Handling Module
//!
//! Every failure surfaced by this crate is a [`FetchError`]: a human readable
//! message plus the [`Additional`] details of the response or transport error
//! that caused it.
//!
//! # Example
//!
//! ```rust,ignore
//! use session_fetch::error::{Additional, FetchError};
//!
//! let error = FetchError::new(Some("Not Found"), Additional::configuration("x"));
//! assert_eq!(error.message(), "Not Found");
//! assert!(!error.is_network_error());
//! ```

// Module declarations
mod conversions;
pub mod types;

// Re-exports for public API
pub use types::*;
