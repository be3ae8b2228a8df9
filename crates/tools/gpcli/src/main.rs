mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use commands::{handle_parse_config, handle_reconcile};
use gp_result::prelude::*;

fn main() -> Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Reconcile { args } => handle_reconcile(args),
        Commands::ParseConfig { path } => handle_parse_config(&path),
    };

    if let Err(ref e) = result {
        log::error!("Error: {}", e);
    }

    result
}
