//! Rendering policy for reconciled results.
//!
//! Maps the abstract [`Outcome`] to the widget's result icon and provides a
//! plain-text view of a [`ReconciledPresentation`]. None of this feeds back
//! into classification.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::reconcile::{Line, Outcome, ReconciledPresentation};

/// Opacity of the result pane while execution is still running.
pub const OPACITY_DIMMED: f32 = 0.5;
/// Opacity of the result pane once execution finished.
pub const OPACITY_NORMAL: f32 = 1.0;

/// Printed after the output of every finished program.
pub const EXIT_FOOTER: &str = "Program exited.";
/// Heading of the expected output block.
pub const EXPECTED_HEADER: &str = "Expected Result";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IconColor {
    Red,
    Green,
}

/// Extra glyph drawn on the result icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IconDecoration {
    /// The test binary built and exited cleanly.
    Build,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultIcon {
    pub success: bool,
    pub color: IconColor,
    pub decoration: Option<IconDecoration>,
}

impl ResultIcon {
    /// Icon for a presentation, `None` while there is nothing to show.
    pub fn for_presentation(presentation: &ReconciledPresentation) -> Option<Self> {
        let icon = match presentation.outcome {
            Outcome::Empty | Outcome::Pending => return None,
            Outcome::RunFailure | Outcome::ExpectationMismatch => ResultIcon {
                success: false,
                color: IconColor::Red,
                decoration: None,
            },
            Outcome::RunSuccess | Outcome::TestPass | Outcome::TestFail => {
                let success = presentation.outcome != Outcome::TestFail;
                ResultIcon {
                    success,
                    color: if success {
                        IconColor::Green
                    } else {
                        IconColor::Red
                    },
                    decoration: (presentation.is_test && presentation.status == 0)
                        .then_some(IconDecoration::Build),
                }
            }
        };
        Some(icon)
    }
}

/// Opacity the result pane is drawn with.
pub fn opacity(presentation: &ReconciledPresentation) -> f32 {
    if presentation.dimmed {
        OPACITY_DIMMED
    } else {
        OPACITY_NORMAL
    }
}

/// Plain-text rendering of a presentation, as shown in a terminal.
pub struct TextRenderer<'a>(pub &'a ReconciledPresentation);

impl fmt::Display for TextRenderer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let presentation = self.0;

        if !presentation.outcome.is_terminal() && presentation.lines.is_empty() {
            if presentation.placeholder {
                writeln!(f)?;
            }
            return Ok(());
        }

        for line in &presentation.lines {
            match line {
                Line::Message { text, delay, .. } => {
                    let text = text.strip_suffix('\n').unwrap_or(text);
                    if delay.is_empty() {
                        writeln!(f, "{text}")?;
                    } else {
                        writeln!(f, "{text} {delay}")?;
                    }
                }
                Line::TestBlock { lines } => {
                    for line in lines {
                        writeln!(f, "{line}")?;
                    }
                }
            }
        }

        if let Some(mismatch) = &presentation.mismatch_block {
            writeln!(f)?;
            writeln!(f, "{EXPECTED_HEADER}")?;
            writeln!(f, "{}", mismatch.expected.strip_suffix('\n').unwrap_or(&mismatch.expected))?;
        }

        writeln!(f, "{EXIT_FOOTER}")
    }
}
