//! Shared configuration types.

mod config;

pub use config::{FetchConfig, FetchConfigBuilder};
