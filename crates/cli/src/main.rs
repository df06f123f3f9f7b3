//! wslrun: run editor build definitions through WSL.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::output::OutputFormat;

mod cmd;
mod output;

/// Translate a `wsl_exec` build definition and execute it in WSL
#[derive(Parser)]
#[command(name = "wslrun")]
#[command(author, version, about, long_about = None)]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Resolve a build definition and launch it
  Run {
    /// Path to the build-definition JSON file
    definition: PathBuf,

    /// Provide a build variable (repeatable), e.g. --set file=C:\proj\a.rb
    #[arg(short, long = "set", value_name = "NAME=VALUE")]
    set: Vec<String>,
  },

  /// Print the resolved invocation without launching anything
  Resolve {
    /// Path to the build-definition JSON file
    definition: PathBuf,

    /// Provide a build variable (repeatable), e.g. --set file=C:\proj\a.rb
    #[arg(short, long = "set", value_name = "NAME=VALUE")]
    set: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
  },
}

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .without_time()
    .init();

  let cli = Cli::parse();

  match cli.command {
    Commands::Run { definition, set } => cmd::cmd_run(&definition, &set),
    Commands::Resolve {
      definition,
      set,
      format,
    } => cmd::cmd_resolve(&definition, &set, format),
  }
}
