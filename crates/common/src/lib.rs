//! iPoint Common Utilities
//!
//! Shared infrastructure for all iPoint crates:
//! - Error types and result aliases
//! - Session clock and rate limiting
//! - Tracing/logging initialization
//! - Configuration loading and the live settings store

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;
pub mod settings;

pub use clock::*;
pub use config::*;
pub use error::*;
pub use settings::*;
