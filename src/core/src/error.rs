use thiserror::Error;

/// Dockerfile parser error types
#[derive(Error, Debug)]
pub enum DockerfileError {
    /// Unknown instruction keyword on a non-comment line
    #[error("Illegal instruction encountered (line: {line}): '{keyword}'")]
    IllegalInstruction { line: usize, keyword: String },

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl DockerfileError {
    /// Logical line index of a lexing failure, if this is one.
    pub fn line(&self) -> Option<usize> {
        match self {
            DockerfileError::IllegalInstruction { line, .. } => Some(*line),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for DockerfileError {
    fn from(err: serde_json::Error) -> Self {
        DockerfileError::SerializationError(err.to_string())
    }
}

impl From<serde_yaml::Error> for DockerfileError {
    fn from(err: serde_yaml::Error) -> Self {
        DockerfileError::SerializationError(err.to_string())
    }
}

/// Result type alias for Dockerfile parser operations
pub type Result<T> = std::result::Result<T, DockerfileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_illegal_instruction_display() {
        let error = DockerfileError::IllegalInstruction {
            line: 0,
            keyword: "BOGUS".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Illegal instruction encountered (line: 0): 'BOGUS'"
        );
    }

    #[test]
    fn test_illegal_instruction_line() {
        let error = DockerfileError::IllegalInstruction {
            line: 7,
            keyword: "NOPE".to_string(),
        };
        assert_eq!(error.line(), Some(7));
        assert_eq!(DockerfileError::ConfigError("x".to_string()).line(), None);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: DockerfileError = io_error.into();
        assert!(matches!(error, DockerfileError::IoError(_)));
        assert!(error.to_string().contains("file not found"));
    }

    #[test]
    fn test_config_error_display() {
        let error = DockerfileError::ConfigError("max_trigger_depth must be > 0".to_string());
        assert_eq!(
            error.to_string(),
            "Configuration error: max_trigger_depth must be > 0"
        );
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<Vec<String>>("not json").unwrap_err();
        let error: DockerfileError = json_err.into();
        assert!(matches!(error, DockerfileError::SerializationError(_)));
    }

    #[test]
    fn test_serde_yaml_error_conversion() {
        let yaml_err = serde_yaml::from_str::<Vec<String>>("{ a: [").unwrap_err();
        let error: DockerfileError = yaml_err.into();
        assert!(error.to_string().starts_with("Serialization error:"));
    }
}
