//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Bootstrap a project's modules from its init.yaml
#[derive(Parser, Debug)]
#[command(name = "boot")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Project root (defaults to the current directory)
    #[arg(short = 'C', long = "project", global = true, value_name = "DIR")]
    pub project: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Fetch every module the project manifest requires
    ///
    /// Reads the seed modules from init.yaml, clones them and everything
    /// they require into their type directories, then records missing
    /// repo_url fields, syncs framework files and writes the workspace file.
    Init {
        /// Maximum number of concurrent fetches
        #[arg(short, long, env = "BOOT_MAX_WORKERS")]
        workers: Option<usize>,
    },

    /// List installed modules
    List {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Install Python requirements for the project and every module
    Install,

    /// Sync framework files from the framework repository
    Update {
        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_init_with_workers() {
        let cli = Cli::parse_from(["boot", "init", "--workers", "3"]);
        assert_eq!(cli.command, Commands::Init { workers: Some(3) });
    }

    #[test]
    fn parse_global_project_after_subcommand() {
        let cli = Cli::parse_from(["boot", "list", "--json", "-C", "/tmp/proj"]);
        assert_eq!(cli.project, Some(PathBuf::from("/tmp/proj")));
        assert_eq!(cli.command, Commands::List { json: true });
    }

    #[test]
    fn parse_update_dry_run() {
        let cli = Cli::parse_from(["boot", "-v", "update", "--dry-run"]);
        assert!(cli.verbose);
        assert_eq!(cli.command, Commands::Update { dry_run: true });
    }

    #[test]
    fn parse_completions() {
        let cli = Cli::parse_from(["boot", "completions", "bash"]);
        assert!(matches!(cli.command, Commands::Completions { shell: Shell::Bash }));
    }

    #[test]
    fn missing_subcommand_is_an_error() {
        assert!(Cli::try_parse_from(["boot"]).is_err());
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
