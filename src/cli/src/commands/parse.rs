//! `dockerfile-parser parse` command.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use dockerfile_parser_core::Config;

use crate::{batch, discover, output};

#[derive(Args)]
pub struct ParseArgs {
    /// Dockerfile or directory containing Dockerfiles
    pub path: PathBuf,

    /// Descend into subdirectories
    #[arg(short, long)]
    pub recursive: bool,
}

pub async fn execute(args: ParseArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();
    let paths = discover::discover(&args.path, &config.discovery, args.recursive)?;
    let parsed = batch::parse_files(paths, &config.parser).await;

    for file in &parsed {
        println!("---\t{}\t---", file.path.display());
        match &file.result {
            Ok(root) => print!("{}", output::render_tree(root)),
            Err(e) => println!("Error: {e}"),
        }
    }

    println!("{}", output::summary_table(&parsed));
    println!(
        "Parsing {} files finished in {:?}",
        parsed.len(),
        start.elapsed()
    );
    Ok(())
}
