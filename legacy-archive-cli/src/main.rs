//! legacy-archive CLI
//!
//! Command-line interface for importing the legacy site into the local
//! content store.

mod commands;
mod error;

use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

use crate::error::CliError;

#[derive(Parser)]
#[command(name = "legacy-archive")]
#[command(about = "Import the legacy site into the local content store", long_about = None)]
struct Cli {
    /// Show debug output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only show warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Arguments shared by every command that works on a project.
#[derive(Args, Clone)]
struct ProjectArgs {
    /// Project root (defaults to current directory)
    #[arg(short, long)]
    project: Option<PathBuf>,
}

impl ProjectArgs {
    fn root(&self) -> PathBuf {
        self.project.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl the legacy pages and merge them into the content store
    Import {
        #[command(flatten)]
        project: ProjectArgs,
    },

    /// Show statistics for the asset manifest
    Manifest {
        #[command(flatten)]
        project: ProjectArgs,
    },

    /// Inspect import path configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show resolved paths and where each one came from
    Show {
        #[command(flatten)]
        project: ProjectArgs,
    },

    /// Print the config file path
    Path {
        #[command(flatten)]
        project: ProjectArgs,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose, cli.quiet);

    let result: Result<(), CliError> = match cli.command {
        Commands::Import { project } => commands::import::run_import(&project.root(), cli.quiet),
        Commands::Manifest { project } => commands::manifest::run_manifest(&project.root()),
        Commands::Config { action } => match action {
            ConfigAction::Show { project } => commands::config::run_config_show(&project.root()),
            ConfigAction::Path { project } => {
                commands::config::run_config_path(&project.root());
                Ok(())
            }
        },
    };

    if let Err(e) = result {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

/// Plain message lines for info, a colored level tag for everything else.
fn init_logger(verbose: bool, quiet: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format(|buf, record| match record.level() {
            log::Level::Info => writeln!(buf, "{}", record.args()),
            log::Level::Error => writeln!(
                buf,
                "{} {}",
                "error:".if_supports_color(Stderr, |t| t.red()),
                record.args()
            ),
            log::Level::Warn => writeln!(
                buf,
                "{} {}",
                "warning:".if_supports_color(Stderr, |t| t.yellow()),
                record.args()
            ),
            _ => writeln!(
                buf,
                "{}",
                record.args().if_supports_color(Stderr, |t| t.dimmed())
            ),
        })
        .init();
}
