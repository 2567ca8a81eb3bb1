//! Dockerfile Parser Core - Shared Types
//!
//! Error and configuration types used by the parser library and the CLI.

pub mod config;
pub mod error;

// Re-export commonly used types
pub use config::{Config, DiscoveryConfig, LogLevel, OutputConfig, ParserConfig};
pub use error::{DockerfileError, Result};

/// Dockerfile parser version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
