//! # Money Common
//!
//! Logging configuration shared by the Money App client crates. Each crate
//! owns its error types; what they share is how they report.

pub mod logging;

pub use logging::{init_logging, LogConfig, LogFormat};
