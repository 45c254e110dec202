use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "nicsweep",
    about = "Remove leftover network adapter configuration from a registry-style store",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Preview what would be removed (dry-run, no mutation)
    Scan {
        /// Path to the store snapshot file
        #[arg(long)]
        store: PathBuf,

        /// Only process catalog locations whose id contains this string
        #[arg(long)]
        location: Option<String>,

        /// Output machine-readable JSON
        #[arg(long)]
        json: bool,

        /// Adapter GUIDs, braced or bare
        guids: Vec<String>,
    },

    /// Remove adapter traces (requires --confirm to actually mutate)
    Purge {
        /// Path to the store snapshot file
        #[arg(long)]
        store: PathBuf,

        /// Actually mutate the store. Without this flag, behaves like scan.
        #[arg(long)]
        confirm: bool,

        /// Only process catalog locations whose id contains this string
        #[arg(long)]
        location: Option<String>,

        /// Output machine-readable JSON
        #[arg(long)]
        json: bool,

        /// Adapter GUIDs, braced or bare
        guids: Vec<String>,
    },

    /// List every catalog location and its strategy
    Locations,
}
