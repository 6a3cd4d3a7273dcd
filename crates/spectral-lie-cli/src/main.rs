use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "spectral-lie")]
#[command(author = "rUv <ruv@ruv.io>")]
#[command(version)]
#[command(about = "Lie algebra cohomology and Hodge Laplacian spectra", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to configuration file (.yaml, .yml or .toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full analysis and export results.json
    Run(commands::run::RunArgs),

    /// Parse and validate a configuration file
    ValidateConfig,

    /// List registered input formats and supported Cartan types
    ListAlgebras,

    /// Inspect the coboundary operator d_p of the configured algebra
    InspectD(commands::inspect::InspectArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_writer(std::io::stderr),
        )
        .with(tracing_subscriber::EnvFilter::new(&cli.log_level))
        .init();

    match cli.command {
        Commands::Run(args) => commands::run::run(args, require_config(cli.config.as_deref())?),
        Commands::ValidateConfig => {
            commands::validate::run(require_config(cli.config.as_deref())?)
        }
        Commands::ListAlgebras => commands::list::run(),
        Commands::InspectD(args) => {
            commands::inspect::run(args, require_config(cli.config.as_deref())?)
        }
    }
}

fn require_config(path: Option<&Path>) -> anyhow::Result<&Path> {
    path.context("this command needs --config <FILE>")
}
