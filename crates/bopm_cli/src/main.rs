//! bopm - Binomial Options Pricing Benchmark CLI
//!
//! Operational entry point for the bopm-bench workspace.
//!
//! # Commands
//!
//! - `bopm run --mode sw` - Price the configured batch on the thread pool
//! - `bopm run --mode hw` - Price on the emulated accelerator and validate
//!   against the software reference
//! - `bopm check` - Parse and echo both configuration tables without running
//!
//! # Architecture
//!
//! As the service layer of the workspace, this crate wires the foundation
//! (`bopm_core`) and execution (`bopm_exec`) layers to the configuration
//! tables, the results report and the process exit status.

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;
mod report;

pub use error::{CliError, Result};

/// Binomial options pricing benchmark CLI
#[derive(Parser)]
#[command(name = "bopm")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price the configured batch and write a results report
    Run {
        /// Execution mode: sw (thread pool) or hw (emulated accelerator)
        #[arg(short, long, default_value = "sw")]
        mode: String,

        /// Test-batch configuration table
        #[arg(short, long, default_value = "data/tests.cfg")]
        tests: String,

        /// Resource configuration table
        #[arg(short, long, default_value = "data/resources.cfg")]
        resources: String,

        /// Results report path (defaults to SW_results.txt / HW_results.txt)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Parse and echo both configuration tables without running
    Check {
        /// Test-batch configuration table
        #[arg(short, long, default_value = "data/tests.cfg")]
        tests: String,

        /// Resource configuration table
        #[arg(short, long, default_value = "data/resources.cfg")]
        resources: String,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialise tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    match cli.command {
        Commands::Run {
            mode,
            tests,
            resources,
            output,
        } => commands::run::run(&mode, &tests, &resources, output.as_deref())?,
        Commands::Check { tests, resources } => commands::check::run(&tests, &resources)?,
    }

    Ok(())
}
