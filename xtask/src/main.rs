//! Terrain Workspace Quality Gate
//!
//! All quality standards are enforced through this single entry point.
//!
//! # Commands
//!
//! - `cargo xtask check` - Run all quality checks
//! - `cargo xtask ci` - Full CI suite (same as GitHub Actions)
//!
//! # Standards
//!
//! 1. Formatting - `cargo fmt` clean
//! 2. Clippy - Zero warnings, pedantic
//! 3. Tests - Unit, property and API regression tests pass
//! 4. Documentation - Zero rustdoc warnings
//! 5. Safety - Zero unwrap/expect in library code
//! 6. Layer 0 - No bevy in any terrain crate's dependency tree

mod check;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Terrain workspace quality gate
#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Quality enforcement for the terrain workspace", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all quality checks across the workspace
    Check {
        /// Run in CI mode (fails on any issue)
        #[arg(long)]
        ci: bool,
    },

    /// Run full CI suite (same as GitHub Actions)
    Ci,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { ci } => check::run(ci),
        Commands::Ci => check::run_ci(),
    }
}
