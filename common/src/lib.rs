//! Shared utilities for appliance startup helpers
//!
//! This crate provides common functionality used by the service entrypoints:
//! - Structured logging initialization
//! - Environment variable parsing helpers
//! - Command execution utilities

pub mod command;
pub mod config;
pub mod logging;

pub use command::sysctl;
pub use config::ConfigExt;
pub use logging::{in_current_span, init_logging};
