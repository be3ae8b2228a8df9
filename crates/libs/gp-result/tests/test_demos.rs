use std::{error::Error, path::Path};

use gp_result::{
    ExecutionResult, GpConfig, Height, Outcome, config::WidgetConfig, presentation::TextRenderer,
    reconcile,
};

const DEMOS: &str = "../../../demos";

#[test]
fn test_config_from_file() -> Result<(), Box<dyn Error>> {
    let config = GpConfig::from_file(&Path::new(DEMOS).join("gp.toml"))?;

    assert_eq!(
        config.widget,
        WidgetConfig {
            result_height: 80,
            expected: Some(String::from("Hello, playground\n")),
        }
    );
    assert_eq!(config.server.bind, "127.0.0.1:3000");
    Ok(())
}

#[test]
fn test_demo_results() -> Result<(), Box<dyn Error>> {
    let config = GpConfig::from_file(&Path::new(DEMOS).join("gp.toml"))?;
    let input = config.widget.input(false);

    let again = ExecutionResult::from_json(&std::fs::read_to_string(
        Path::new(DEMOS).join("hello_again.json"),
    )?)?;
    let presentation = reconcile(&again, &input);
    assert_eq!(presentation.outcome, Outcome::ExpectationMismatch);
    assert_eq!(presentation.height, Height::Fixed(80));
    assert!(TextRenderer(&presentation).to_string().contains("Expected Result"));

    let test_fail = ExecutionResult::from_json(&std::fs::read_to_string(
        Path::new(DEMOS).join("test_fail.json"),
    )?)?;
    let presentation = reconcile(&test_fail, &input);
    assert_eq!(presentation.outcome, Outcome::TestFail);
    assert_eq!(presentation.mismatch_block, None);
    Ok(())
}
