//! CLI argument definitions for the soundtrack command-line interface.

use clap::{Parser, Subcommand};

/// Soundtrack - Loop assembly, fades, and stem mixing for game soundtracks
#[derive(Parser)]
#[command(name = "soundtrack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Validate a soundtrack config without loading any audio
    Validate {
        /// Path to the soundtrack config (JSON)
        config: String,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Build every track of a soundtrack config
    Build {
        /// Path to the soundtrack config (JSON)
        config: String,

        /// Output directory (default: the config's `output` key, else ./out next to the config)
        #[arg(short, long)]
        output: Option<String>,

        /// Worker threads (0 = one per CPU)
        #[arg(short, long, default_value_t = 0)]
        jobs: usize,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,

        /// Show debug logging
        #[arg(short, long)]
        verbose: bool,
    },
}
