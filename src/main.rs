// src/main.rs

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber for logging
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    match cli.command {
        Commands::Format {
            files,
            inplace,
            output,
            diff,
            options,
        } => commands::cmd_format(&files, inplace, output.as_deref(), diff, &options),
        Commands::Check { files, options } => commands::cmd_check(&files, &options),
        Commands::Completions { shell } => commands::cmd_completions(shell),
    }
}
