use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gpcli")]
#[command(about = "gp - Reconcile playground execution results")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Reconcile an execution result stored as JSON
    Reconcile {
        #[command(flatten)]
        args: ReconcileArgs,
    },

    /// Parse and display a configuration file
    ParseConfig {
        /// Path to the configuration file
        path: PathBuf,
    },
}

#[derive(Args)]
pub struct ReconcileArgs {
    /// Execution result in the playground wire format
    pub result: PathBuf,

    /// Expected program output
    #[arg(long, conflicts_with = "expected_file")]
    pub expected: Option<String>,

    /// File holding the expected program output
    #[arg(long)]
    pub expected_file: Option<PathBuf>,

    /// Configuration file providing widget defaults
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Treat the execution as still running
    #[arg(long)]
    pub loading: bool,

    /// Print the presentation as JSON instead of text
    #[arg(long)]
    pub json: bool,
}
