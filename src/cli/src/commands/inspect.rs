//! `dockerfile-parser inspect` command: print the syntax tree as JSON.

use std::path::PathBuf;

use clap::Args;
use dockerfile_parser::StageNode;
use dockerfile_parser_core::Config;
use serde::Serialize;

use crate::batch;

#[derive(Args)]
pub struct InspectArgs {
    /// Dockerfile to inspect
    pub file: PathBuf,
}

/// JSON document printed by `inspect`.
#[derive(Serialize)]
struct InspectReport<'a> {
    path: String,
    stages: Vec<&'a StageNode>,
}

pub async fn execute(args: InspectArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let root = batch::parse_file(&args.file, &config.parser)?;
    println!("{}", render_report(&args.file, &root)?);
    Ok(())
}

/// Serialize every stage on its own so the output stays flat.
fn render_report(path: &std::path::Path, root: &StageNode) -> serde_json::Result<String> {
    let report = InspectReport {
        path: path.display().to_string(),
        stages: root.stages().collect(),
    };
    serde_json::to_string_pretty(&report)
}
