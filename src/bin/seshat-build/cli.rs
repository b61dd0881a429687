//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use seshat_build::core::{Arch, OsFamily};

/// seshat-build - builds the matrix-seshat native module and its native dependencies
#[derive(Parser)]
#[command(name = "seshat-build")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project root (defaults to the current directory)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Project config file (defaults to <root>/seshat-build.toml)
    #[arg(long, global = true, env = "SESHAT_BUILD_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the native dependencies, then the module
    Build(BuildArgs),

    /// Show the stages a build would run, without running them
    Plan(PlanArgs),

    /// Check that the tools and sources a build needs are present
    Doctor(DoctorArgs),
}

#[derive(Args)]
pub struct BuildArgs {
    /// Target architecture (x64, ia32, arm64)
    #[arg(long, env = "SESHAT_BUILD_ARCH")]
    pub arch: Option<Arch>,
}

#[derive(Args)]
pub struct PlanArgs {
    /// Platform to plan for (windows, macos, linux)
    #[arg(long)]
    pub platform: Option<OsFamily>,

    /// Target architecture (x64, ia32, arm64)
    #[arg(long)]
    pub arch: Option<Arch>,

    /// Emit the plan as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct DoctorArgs {
    /// Target architecture (x64, ia32, arm64)
    #[arg(long)]
    pub arch: Option<Arch>,
}
