//! The result reconciler.
//!
//! [`reconcile`] is a pure function from an [`ExecutionResult`] snapshot and
//! the widget's [`ReconciliationInput`] to a [`ReconciledPresentation`]. It
//! keeps no state between calls: a streaming collaborator hands it a complete
//! snapshot every time something changes and renders whatever comes back.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::execution::{Event, EventKind, Events, ExecutionResult};

/// Rendering parameters supplied by the widget.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconciliationInput {
    /// Output the caller asserts the program should produce.
    pub expected: Option<String>,
    /// Execution is still in flight.
    pub loading: bool,
    /// Requested height of the result pane, `0` for auto.
    pub result_height: u32,
}

/// Height of the result pane.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Height {
    #[default]
    Auto,
    Fixed(u32),
}

impl Height {
    pub fn from_result_height(result_height: u32) -> Self {
        match result_height {
            0 => Height::Auto,
            height => Height::Fixed(height),
        }
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self, Height::Fixed(_))
    }
}

/// Classification of an execution result for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Nothing to show.
    Empty,
    /// Waiting for the first output of a submission.
    Pending,
    TestPass,
    TestFail,
    RunSuccess,
    /// Program exited with a non-zero status.
    RunFailure,
    /// Program exited cleanly but its output differs from the expected one.
    ExpectationMismatch,
}

impl Outcome {
    /// Whether this is one of the final classifications of a run.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::Empty | Outcome::Pending)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::TestPass | Outcome::RunSuccess)
    }
}

/// One renderable record of the output pane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Line {
    /// Output of a plain run, one per event.
    Message {
        text: String,
        kind: EventKind,
        /// Formatted delay annotation, empty when the event carries none.
        delay: String,
    },
    /// Output of a test run event, split into preformatted lines.
    TestBlock { lines: Vec<String> },
}

/// Expected output shown next to the actual output on a mismatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MismatchBlock {
    pub expected: String,
}

/// Everything the rendering layer needs to draw the result pane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciledPresentation {
    pub outcome: Outcome,
    pub lines: Vec<Line>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mismatch_block: Option<MismatchBlock>,
    pub height: Height,
    /// Draw an empty pane of `height` while waiting for output.
    pub placeholder: bool,
    /// Render with reduced emphasis because execution is still running.
    pub dimmed: bool,
    pub status: i32,
    pub is_test: bool,
}

/// Format the delay annotation of an event.
pub fn format_delay(delay_millis: u64) -> String {
    format!("+{delay_millis}ms")
}

/// Classify `result` and lay out its output.
pub fn reconcile(result: &ExecutionResult, input: &ReconciliationInput) -> ReconciledPresentation {
    let height = Height::from_result_height(input.result_height);

    let events = match &result.events {
        Events::Present(events) => events,
        Events::Absent | Events::Null => {
            let outcome = if input.loading && height.is_fixed() {
                Outcome::Pending
            } else {
                Outcome::Empty
            };
            return ReconciledPresentation {
                outcome,
                lines: Vec::new(),
                mismatch_block: None,
                height,
                placeholder: result.events.is_absent() && height.is_fixed(),
                dimmed: input.loading,
                status: result.status,
                is_test: result.is_test,
            };
        }
    };

    let mismatch_block = match (&input.expected, result.is_test) {
        (Some(expected), false) if !output_matches(events, expected) => Some(MismatchBlock {
            expected: expected.clone(),
        }),
        _ => None,
    };

    let outcome = if result.is_test {
        if result.tests_failed {
            Outcome::TestFail
        } else {
            Outcome::TestPass
        }
    } else if result.status != 0 {
        Outcome::RunFailure
    } else if mismatch_block.is_some() {
        Outcome::ExpectationMismatch
    } else {
        Outcome::RunSuccess
    };

    let lines = events
        .iter()
        .map(|event| render_line(event, result.is_test))
        .collect();

    ReconciledPresentation {
        outcome,
        lines,
        mismatch_block,
        height,
        placeholder: false,
        dimmed: input.loading,
        status: result.status,
        is_test: result.is_test,
    }
}

/// Compares the concatenated output with `expected` without allocating it.
fn output_matches(events: &[Event], expected: &str) -> bool {
    let mut rest = expected.as_bytes();
    for event in events {
        match rest.strip_prefix(event.message.as_bytes()) {
            Some(tail) => rest = tail,
            None => return false,
        }
    }
    rest.is_empty()
}

fn render_line(event: &Event, is_test: bool) -> Line {
    if is_test {
        return Line::TestBlock {
            lines: event.message.split('\n').map(String::from).collect(),
        };
    }

    // A zero delay carries no information and is not annotated.
    let delay = match event.delay_millis {
        Some(delay) if delay > 0 => format_delay(delay),
        _ => String::new(),
    };
    Line::Message {
        text: event.message.clone(),
        kind: event.kind,
        delay,
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Empty => write!(f, "empty"),
            Outcome::Pending => write!(f, "pending"),
            Outcome::TestPass => write!(f, "tests passed"),
            Outcome::TestFail => write!(f, "tests failed"),
            Outcome::RunSuccess => write!(f, "run succeeded"),
            Outcome::RunFailure => write!(f, "run failed"),
            Outcome::ExpectationMismatch => write!(f, "unexpected output"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expecting(expected: &str) -> ReconciliationInput {
        ReconciliationInput {
            expected: Some(String::from(expected)),
            ..Default::default()
        }
    }

    #[test]
    fn format_delay_annotates_millis() {
        assert_eq!(format_delay(20), "+20ms");
        assert_eq!(format_delay(0), "+0ms");
    }

    #[test]
    fn zero_height_is_auto() {
        assert_eq!(Height::from_result_height(0), Height::Auto);
        assert_eq!(Height::from_result_height(80), Height::Fixed(80));
    }

    #[test]
    fn absent_events_with_height_request_placeholder() {
        let input = ReconciliationInput {
            result_height: 80,
            ..Default::default()
        };
        let presentation = reconcile(&ExecutionResult::pending(), &input);

        assert_eq!(presentation.outcome, Outcome::Empty);
        assert!(presentation.placeholder);
        assert_eq!(presentation.height, Height::Fixed(80));
        assert!(presentation.lines.is_empty());
    }

    #[test]
    fn null_events_never_request_placeholder() {
        let input = ReconciliationInput {
            result_height: 80,
            loading: true,
            ..Default::default()
        };
        let presentation = reconcile(&ExecutionResult::terminated(), &input);

        assert_eq!(presentation.outcome, Outcome::Pending);
        assert!(!presentation.placeholder);
        assert!(presentation.lines.is_empty());
    }

    #[test]
    fn loading_without_height_stays_empty() {
        let input = ReconciliationInput {
            loading: true,
            ..Default::default()
        };
        let presentation = reconcile(&ExecutionResult::pending(), &input);

        assert_eq!(presentation.outcome, Outcome::Empty);
        assert!(presentation.dimmed);
        assert!(!presentation.placeholder);
    }

    #[test]
    fn nonzero_status_wins_over_mismatch_label() {
        let result = ExecutionResult::run(vec![Event::new("panic: oops\n")], 2);
        let presentation = reconcile(&result, &expecting("Hello, playground\n"));

        assert_eq!(presentation.outcome, Outcome::RunFailure);
        assert_eq!(
            presentation.mismatch_block,
            Some(MismatchBlock {
                expected: String::from("Hello, playground\n")
            })
        );
    }

    #[test]
    fn matching_split_across_events() {
        let result = ExecutionResult::run(vec![Event::new("Hello, "), Event::new("playground\n")], 0);
        let presentation = reconcile(&result, &expecting("Hello, playground\n"));

        assert_eq!(presentation.outcome, Outcome::RunSuccess);
        assert_eq!(presentation.mismatch_block, None);
    }

    #[test]
    fn prefix_of_expected_is_a_mismatch() {
        let result = ExecutionResult::run(vec![Event::new("Hello")], 0);
        let presentation = reconcile(&result, &expecting("Hello, playground\n"));

        assert_eq!(presentation.outcome, Outcome::ExpectationMismatch);
    }

    #[test]
    fn empty_events_match_empty_expectation() {
        let result = ExecutionResult::run(Vec::new(), 0);

        assert_eq!(reconcile(&result, &expecting("")).outcome, Outcome::RunSuccess);
        assert_eq!(
            reconcile(&result, &expecting("x")).outcome,
            Outcome::ExpectationMismatch
        );
    }

    #[test]
    fn test_run_ignores_expectation() {
        let result = ExecutionResult::test(vec![Event::new("ok\n")], false);
        let presentation = reconcile(&result, &expecting("something else"));

        assert_eq!(presentation.outcome, Outcome::TestPass);
        assert_eq!(presentation.mismatch_block, None);
    }

    #[test]
    fn test_run_ignores_status() {
        let mut result = ExecutionResult::test(vec![Event::new("ok\n")], false);
        result.status = 1;

        assert_eq!(
            reconcile(&result, &ReconciliationInput::default()).outcome,
            Outcome::TestPass
        );
    }

    #[test]
    fn test_output_split_keeps_empty_segments() {
        let result = ExecutionResult::test(vec![Event::new("a\n\nb\n")], true);
        let presentation = reconcile(&result, &ReconciliationInput::default());

        assert_eq!(
            presentation.lines,
            vec![Line::TestBlock {
                lines: vec![
                    String::from("a"),
                    String::from(""),
                    String::from("b"),
                    String::from("")
                ]
            }]
        );
    }

    #[test]
    fn run_lines_carry_delay_and_kind() {
        let result = ExecutionResult::run(
            vec![
                Event::with_delay("first\n", 0),
                Event::with_delay("second\n", 20),
                Event::stderr("third\n"),
            ],
            0,
        );
        let presentation = reconcile(&result, &ReconciliationInput::default());

        assert_eq!(
            presentation.lines,
            vec![
                Line::Message {
                    text: String::from("first\n"),
                    kind: EventKind::Stdout,
                    delay: String::new(),
                },
                Line::Message {
                    text: String::from("second\n"),
                    kind: EventKind::Stdout,
                    delay: String::from("+20ms"),
                },
                Line::Message {
                    text: String::from("third\n"),
                    kind: EventKind::Stderr,
                    delay: String::new(),
                },
            ]
        );
    }

    #[test]
    fn outcome_terminality() {
        assert!(!Outcome::Empty.is_terminal());
        assert!(!Outcome::Pending.is_terminal());
        assert!(Outcome::ExpectationMismatch.is_terminal());
        assert!(Outcome::TestPass.is_success());
        assert!(!Outcome::ExpectationMismatch.is_success());
    }
}
