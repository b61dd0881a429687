//! seshat-build CLI - builds the matrix-seshat native module

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use seshat_build::{BuildError, GlobalContext};

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);

        // A tool that ran and failed passes its exit code through
        let code = e
            .downcast_ref::<BuildError>()
            .and_then(BuildError::exit_code)
            .unwrap_or(1);
        std::process::exit(code);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("seshat_build=debug")
    } else {
        EnvFilter::new("seshat_build=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let ctx = GlobalContext::with_root(cli.root.as_deref(), cli.config.as_deref())?;

    // Execute command
    match cli.command {
        Commands::Build(args) => commands::build::execute(args, &ctx),
        Commands::Plan(args) => commands::plan::execute(args, &ctx),
        Commands::Doctor(args) => commands::doctor::execute(args, &ctx, cli.verbose),
    }
}
