//! Module bootstrapper CLI

mod cli;
mod commands;
mod error;

use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let root = match cli.project {
        Some(path) => path,
        None => std::env::current_dir()?,
    };
    execute_command(cli.command, root)
}

/// Log to stderr. `RUST_LOG` wins; otherwise `info`, or `debug` with `-v`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .try_init();
}

fn execute_command(cmd: Commands, root: PathBuf) -> Result<()> {
    match cmd {
        Commands::Init { workers } => commands::run_init(&root, workers),
        Commands::List { json } => commands::run_list(&root, json),
        Commands::Install => commands::run_install(&root),
        Commands::Update { dry_run } => commands::run_update(&root, dry_run),
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "boot", &mut std::io::stdout());
            Ok(())
        }
    }
}
