use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{DockerfileError, Result};

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Parser limits
    pub parser: ParserConfig,

    /// Which files the CLI picks up
    pub discovery: DiscoveryConfig,

    /// Where reconstructed files are written
    pub output: OutputConfig,

    /// Log level
    pub log_level: LogLevel,
}

impl Config {
    /// Load configuration from a YAML (`.yaml`/`.yml`) or JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DockerfileError::ConfigError(format!(
                "Failed to read config at {}: {}",
                path.display(),
                e
            ))
        })?;

        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        let config: Config = if is_yaml {
            serde_yaml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject values the parser or discovery cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.parser.max_trigger_depth == 0 {
            return Err(DockerfileError::ConfigError(
                "parser.max_trigger_depth must be greater than 0".to_string(),
            ));
        }
        if self.discovery.suffixes.is_empty() && self.discovery.file_names.is_empty() {
            return Err(DockerfileError::ConfigError(
                "discovery needs at least one suffix or file name".to_string(),
            ));
        }
        Ok(())
    }
}

/// Parser configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Maximum nesting of ONBUILD triggers re-parsed as instructions
    pub max_trigger_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_trigger_depth: 4,
        }
    }
}

/// File discovery configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// File name suffixes that mark a build description (e.g. ".Dockerfile")
    pub suffixes: Vec<String>,

    /// Exact file names that mark a build description
    pub file_names: Vec<String>,

    /// Descend into subdirectories
    pub recursive: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            suffixes: vec![".Dockerfile".to_string()],
            file_names: vec!["Dockerfile".to_string()],
            recursive: false,
        }
    }
}

impl DiscoveryConfig {
    /// Whether a file name looks like a build description.
    pub fn matches(&self, file_name: &str) -> bool {
        self.file_names.iter().any(|n| n == file_name)
            || self.suffixes.iter().any(|s| file_name.ends_with(s.as_str()))
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for reconstructed files
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./out"),
        }
    }
}

/// Log level
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    #[default]
    Warn,
    Error,
}

impl LogLevel {
    /// Directive string for `tracing_subscriber::EnvFilter`.
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}
