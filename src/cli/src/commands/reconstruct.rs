//! `dockerfile-parser reconstruct` command.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use dockerfile_parser::reconstruct;
use dockerfile_parser_core::Config;

use crate::{batch, discover, output};

#[derive(Args)]
pub struct ReconstructArgs {
    /// Dockerfile or directory containing Dockerfiles
    pub path: PathBuf,

    /// Descend into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Output directory (defaults to the configured one)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub async fn execute(
    args: ReconstructArgs,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();
    let out_dir = args.output.unwrap_or_else(|| config.output.dir.clone());
    let paths = discover::discover(&args.path, &config.discovery, args.recursive)?;
    let parsed = batch::parse_files(paths, &config.parser).await;

    let mut written = 0;
    for file in &parsed {
        match &file.result {
            Ok(root) => {
                let lines = reconstruct(root);
                let relative = output::output_relative_path(&args.path, &file.path);
                let path = output::write_reconstructed(&out_dir, &relative, &lines)?;
                tracing::info!(source = %file.path.display(), output = %path.display(), "Reconstructed");
                written += 1;
            }
            Err(e) => eprintln!("{}: {e}", file.path.display()),
        }
    }

    println!(
        "Reconstructed {written} of {} files into {} in {:?}",
        parsed.len(),
        out_dir.display(),
        start.elapsed()
    );
    Ok(())
}
