//! Dockerfile discovery.

use std::path::{Path, PathBuf};

use dockerfile_parser_core::{DiscoveryConfig, Result};

/// Collect the Dockerfiles under `path`.
///
/// A file path is returned as-is. A directory is listed (recursively when
/// `recursive` or the config says so) for names matching the discovery
/// config. Results are sorted by path.
pub fn discover(path: &Path, config: &DiscoveryConfig, recursive: bool) -> Result<Vec<PathBuf>> {
    let metadata = std::fs::metadata(path)?;
    if !metadata.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = Vec::new();
    collect(path, config, recursive || config.recursive, &mut files)?;
    files.sort();
    tracing::debug!(dir = %path.display(), count = files.len(), "Discovered Dockerfiles");
    Ok(files)
}

fn collect(
    dir: &Path,
    config: &DiscoveryConfig,
    recursive: bool,
    files: &mut Vec<PathBuf>,
) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            if recursive {
                collect(&path, config, recursive, files)?;
            }
            continue;
        }
        let matches = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| config.matches(name));
        if matches {
            files.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        std::fs::write(path, "FROM alpine\n").unwrap();
    }

    #[test]
    fn test_discover_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("anything.txt");
        touch(&file);
        let files = discover(&file, &DiscoveryConfig::default(), false).unwrap();
        assert_eq!(files, vec![file]);
    }

    #[test]
    fn test_discover_directory_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("b.Dockerfile"));
        touch(&dir.path().join("a.Dockerfile"));
        touch(&dir.path().join("Dockerfile"));
        touch(&dir.path().join("README.md"));
        let nested = dir.path().join("nested");
        std::fs::create_dir(&nested).unwrap();
        touch(&nested.join("c.Dockerfile"));

        let files = discover(dir.path(), &DiscoveryConfig::default(), false).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["Dockerfile", "a.Dockerfile", "b.Dockerfile"]);
    }

    #[test]
    fn test_discover_recursive() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.Dockerfile"));
        let nested = dir.path().join("nested");
        std::fs::create_dir(&nested).unwrap();
        touch(&nested.join("c.Dockerfile"));

        let files = discover(dir.path(), &DiscoveryConfig::default(), true).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.contains(&nested.join("c.Dockerfile")));
    }

    #[test]
    fn test_discover_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let result = discover(&dir.path().join("missing"), &DiscoveryConfig::default(), false);
        assert!(result.is_err());
    }
}
