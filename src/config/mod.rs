//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Top-level config, client identity and loading
//! - [`logging`]: Log filter and output format

mod logging;
mod types;

pub use logging::{LogFormat, LoggingConfig};
pub use types::{ClientConfig, Config, ConfigError};
