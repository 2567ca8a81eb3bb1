//! Concurrent parsing of many Dockerfiles.
//!
//! Each file is read and parsed on the blocking pool; results come back in
//! input order. A failure in one file never aborts the others.

use std::path::{Path, PathBuf};

use dockerfile_parser::{parse_lines_with_config, StageNode};
use dockerfile_parser_core::{DockerfileError, ParserConfig, Result};

/// Outcome of parsing one file.
#[derive(Debug)]
pub struct ParsedFile {
    pub path: PathBuf,
    pub result: Result<StageNode>,
}

/// Read and parse a single Dockerfile.
pub fn parse_file(path: &Path, config: &ParserConfig) -> Result<StageNode> {
    let content = std::fs::read_to_string(path)?;
    let lines: Vec<&str> = content.lines().collect();
    parse_lines_with_config(&lines, config)
}

/// Parse every file concurrently, one blocking task per file.
pub async fn parse_files(paths: Vec<PathBuf>, config: &ParserConfig) -> Vec<ParsedFile> {
    let handles: Vec<_> = paths
        .into_iter()
        .map(|path| {
            let config = config.clone();
            let task_path = path.clone();
            let handle = tokio::task::spawn_blocking(move || parse_file(&task_path, &config));
            (path, handle)
        })
        .collect();

    let mut parsed = Vec::with_capacity(handles.len());
    for (path, handle) in handles {
        let result = match handle.await {
            Ok(result) => result,
            Err(e) => Err(DockerfileError::IoError(std::io::Error::other(format!(
                "parse task failed: {e}"
            )))),
        };
        if let Err(e) = &result {
            tracing::warn!(path = %path.display(), error = %e, "Failed to parse Dockerfile");
        }
        parsed.push(ParsedFile { path, result });
    }
    parsed
}
