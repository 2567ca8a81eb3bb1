//! CLI command definitions and dispatch.

mod inspect;
mod parse;
mod reconstruct;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use dockerfile_parser_core::{Config, Result};

/// Dockerfile parser: lex, parse and reconstruct Dockerfiles.
#[derive(Parser)]
#[command(name = "dockerfile-parser", version, about)]
pub struct Cli {
    /// Configuration file (YAML or JSON)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Command {
    /// Parse Dockerfiles and print their stage trees
    Parse(parse::ParseArgs),
    /// Parse Dockerfiles and write their canonical form
    Reconstruct(reconstruct::ReconstructArgs),
    /// Print the syntax tree of a Dockerfile as JSON
    Inspect(inspect::InspectArgs),
}

/// Load the configuration file, or the defaults when none is given.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::from_file(path),
        None => Ok(Config::default()),
    }
}

/// Dispatch a parsed CLI command to its handler.
pub async fn dispatch(cli: Cli, config: Config) -> std::result::Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Parse(args) => parse::execute(args, &config).await,
        Command::Reconstruct(args) => reconstruct::execute(args, &config).await,
        Command::Inspect(args) => inspect::execute(args, &config).await,
    }
}
