//! Console and file output for the CLI.

use std::path::{Path, PathBuf};

use comfy_table::{ContentArrangement, Table};
use dockerfile_parser::StageNode;
use dockerfile_parser_core::Result;

use crate::batch::ParsedFile;

/// Create a styled table with the given headers.
pub fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.load_preset(comfy_table::presets::NOTHING);
    table.set_header(headers);
    table
}

/// Render a stage chain as an indented tree, one stage per header line.
pub fn render_tree(root: &StageNode) -> String {
    let mut out = String::new();
    for stage in root.stages() {
        out.push_str(&format!("{stage}\n"));
        for instruction in &stage.instructions {
            out.push_str(&format!(" > {instruction}\n"));
        }
    }
    out
}

/// Summary table over a batch of parsed files.
pub fn summary_table(files: &[ParsedFile]) -> Table {
    let mut table = new_table(&["FILE", "STAGES", "INSTRUCTIONS", "STATUS"]);
    for file in files {
        let name = file.path.display().to_string();
        match &file.result {
            Ok(root) => table.add_row(vec![
                name,
                // The root stage is implicit
                (root.stage_count() - 1).to_string(),
                root.instruction_count().to_string(),
                "ok".to_string(),
            ]),
            Err(e) => table.add_row(vec![name, "-".to_string(), "-".to_string(), e.to_string()]),
        };
    }
    table
}

/// Output path for `file`, relative to the discovery `root`.
///
/// Files found under a directory keep their sub-path so that two
/// `Dockerfile`s in different subdirectories do not collide. A single file
/// input (or a file outside `root`) maps to its bare file name.
pub fn output_relative_path(root: &Path, file: &Path) -> PathBuf {
    match file.strip_prefix(root) {
        Ok(relative) if !relative.as_os_str().is_empty() => relative.to_path_buf(),
        _ => file
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| file.to_path_buf()),
    }
}

/// Write reconstructed lines to `dir/relative`, creating parent directories
/// first.
pub fn write_reconstructed(dir: &Path, relative: &Path, lines: &[String]) -> Result<PathBuf> {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, lines.join("\n"))?;
    Ok(path)
}
