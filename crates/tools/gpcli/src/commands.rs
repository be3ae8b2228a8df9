use std::path::Path;

use gp_result::{
    ExecutionResult, GpConfig, ReconciliationInput,
    presentation::{ResultIcon, TextRenderer},
    prelude::*,
    reconcile,
};
use log::{debug, info};

use crate::cli::ReconcileArgs;

fn load_config(path: Option<&Path>) -> Result<GpConfig> {
    match path {
        Some(path) => GpConfig::from_file(path),
        None => Ok(GpConfig::default()),
    }
}

/// Builds the reconciliation input: command line flags win over the
/// configured widget defaults.
fn reconciliation_input(args: &ReconcileArgs, config: &GpConfig) -> Result<ReconciliationInput> {
    let mut input = config.widget.input(args.loading);
    if let Some(expected) = &args.expected {
        input.expected = Some(expected.clone());
    } else if let Some(path) = &args.expected_file {
        input.expected = Some(std::fs::read_to_string(path)?);
    }
    Ok(input)
}

pub fn handle_reconcile(args: ReconcileArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let input = reconciliation_input(&args, &config)?;

    let payload = std::fs::read_to_string(&args.result)?;
    let result = ExecutionResult::from_json(&payload)?;
    info!("{}", result);

    let presentation = reconcile(&result, &input);
    debug!("Outcome: {}", presentation.outcome);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&presentation)?);
        return Ok(());
    }

    if let Some(icon) = ResultIcon::for_presentation(&presentation) {
        let mark = if icon.success { "✔" } else { "✘" };
        println!("{mark} {}", presentation.outcome);
    }
    print!("{}", TextRenderer(&presentation));
    Ok(())
}

pub fn handle_parse_config(path: &Path) -> Result<()> {
    let config = GpConfig::from_file(path)?;
    println!("{config:#?}");
    Ok(())
}
