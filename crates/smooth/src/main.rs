//! smooth-criminal CLI - Main entry point

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "smooth")]
#[command(version)]
#[command(about = "smooth-criminal editor integration", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the language server over stdio
    Lsp,

    /// Analyze a Python file and print the oracle's suggestions
    Analyze {
        /// File to analyze (reads stdin when omitted or '-')
        file: Option<PathBuf>,

        /// Interpreter that runs the analyzer (overrides SMOOTH_CRIMINAL_PYTHON)
        #[arg(long, value_name = "PROGRAM")]
        python: Option<String>,

        /// Argument passed to the interpreter instead of the built-in analyzer script
        #[arg(long = "oracle-arg", value_name = "ARG", allow_hyphen_values = true)]
        oracle_args: Vec<String>,

        /// Seconds to wait for the analyzer (0 waits indefinitely)
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,
    },
}

fn main() -> Result<ExitCode> {
    // Logs go to stderr: stdout carries LSP traffic and analyze output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "smooth=info,smooth_lsp=info,smooth_lsp_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Lsp => commands::lsp::execute().map(|()| ExitCode::SUCCESS),
        Commands::Analyze {
            file,
            python,
            oracle_args,
            timeout,
        } => commands::analyze::execute(commands::analyze::AnalyzeArgs {
            file,
            python,
            oracle_args,
            timeout,
        }),
    }
}
