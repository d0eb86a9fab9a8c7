//! layergate CLI tool.
//!
//! Usage:
//! ```bash
//! layergate check --components analysis.json [OPTIONS]
//! layergate cycles --components analysis.json
//! layergate list-rules
//! layergate init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use layergate_core::PatternOptions;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Import-layer validation for analyzed codebases
#[derive(Parser)]
#[command(name = "layergate")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate components against the configured rules
    Check {
        /// Analyzer output (JSON array or `{ "components": [...] }`)
        #[arg(long)]
        components: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Only run specific rules (comma-separated)
        #[arg(long)]
        rules: Option<String>,

        /// Do not let layer wildcards match dot-prefixed files and directories
        #[arg(long)]
        no_dot: bool,
    },

    /// Report dependency cycles between components
    Cycles {
        /// Analyzer output (JSON array or `{ "components": [...] }`)
        #[arg(long)]
        components: PathBuf,

        /// Output format (`compact` prints the same as `text`)
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// List configured rules
    ListRules,

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for validation results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-violation compact format.
    Compact,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let project_dir = Path::new(".");

    match cli.command {
        Commands::Check {
            components,
            format,
            rules,
            no_dot,
        } => {
            let source = config_resolver::resolve(project_dir, cli.config.as_deref());
            let options = PatternOptions {
                dot: !no_dot,
                ..PatternOptions::default()
            };
            commands::check::run(&components, format, rules.as_deref(), options, &source)
        }
        Commands::Cycles { components, format } => commands::cycles::run(&components, format),
        Commands::ListRules => {
            let source = config_resolver::resolve(project_dir, cli.config.as_deref());
            commands::list_rules::run(&source)
        }
        Commands::Init { force } => commands::init::run(force),
    }
}
