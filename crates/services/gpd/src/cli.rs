//! Command-line interface for the gp service.

use clap::Parser;
use std::path::PathBuf;

/// Command-line interface for the gp service.
#[derive(Parser)]
#[command(name = "gpd")]
#[command(about = "gpd - Reconcile playground execution results over HTTP and WebSocket")]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Address to listen on, overrides the configuration file
    #[arg(short, long, env = "GPD_BIND")]
    pub bind: Option<String>,
}
