//! Execution results as reported by the remote execution service.
//!
//! The wire format is the one the playground backend answers with:
//!
//! ```json
//! {
//!   "Events": [{ "Message": "Hello, playground\n", "Kind": "stdout", "Delay": 0 }],
//!   "IsTest": false,
//!   "TestsFailed": 0,
//!   "Status": 0
//! }
//! ```
//!
//! `Events` is tri-state: a missing key means the program has not produced
//! anything yet, an explicit `null` means it terminated without output.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::error::Category;

use crate::prelude::*;

/// Output stream an event was written to.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    #[default]
    Stdout,
    Stderr,
}

/// One unit of streamed program output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Event {
    /// Raw output text, newlines included.
    pub message: String,
    /// Stream the text was written to.
    #[serde(default)]
    pub kind: EventKind,
    /// Delay since the previous event, in milliseconds.
    #[serde(rename = "Delay", default, skip_serializing_if = "Option::is_none")]
    pub delay_millis: Option<u64>,
}

impl Event {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: EventKind::Stdout,
            delay_millis: None,
        }
    }

    pub fn with_delay(message: impl Into<String>, delay_millis: u64) -> Self {
        Self {
            delay_millis: Some(delay_millis),
            ..Self::new(message)
        }
    }

    pub fn stderr(message: impl Into<String>) -> Self {
        Self {
            kind: EventKind::Stderr,
            ..Self::new(message)
        }
    }
}

/// Event sequence of an execution result.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum Events {
    /// No output reported yet.
    #[default]
    Absent,
    /// Execution terminated without any output.
    Null,
    /// Output reported so far, in order.
    Present(Vec<Event>),
}

impl Events {
    pub fn is_absent(&self) -> bool {
        matches!(self, Events::Absent)
    }

    /// Returns the events when the sequence is present.
    pub fn as_slice(&self) -> Option<&[Event]> {
        match self {
            Events::Present(events) => Some(events),
            Events::Absent | Events::Null => None,
        }
    }
}

impl From<Vec<Event>> for Events {
    fn from(events: Vec<Event>) -> Self {
        Events::Present(events)
    }
}

impl Serialize for Events {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Events::Present(events) => events.serialize(serializer),
            Events::Absent | Events::Null => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for Events {
    // Only reached when the key is present; a missing key takes the default.
    fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<Vec<Event>>::deserialize(deserializer)? {
            Some(events) => Events::Present(events),
            None => Events::Null,
        })
    }
}

/// Result of one remote execution, as a complete snapshot.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExecutionResult {
    /// Output events reported so far.
    #[serde(default, skip_serializing_if = "Events::is_absent")]
    pub events: Events,
    /// Whether the submitted program was a test run.
    #[serde(default)]
    pub is_test: bool,
    /// Whether any test failed. Only meaningful when `is_test` is set.
    #[serde(default, deserialize_with = "deserialize_tests_failed")]
    pub tests_failed: bool,
    /// Exit status of the program, `0` on success.
    #[serde(default)]
    pub status: i32,
}

impl ExecutionResult {
    /// A plain program run.
    pub fn run(events: Vec<Event>, status: i32) -> Self {
        Self {
            events: Events::Present(events),
            status,
            ..Default::default()
        }
    }

    /// A test run.
    pub fn test(events: Vec<Event>, tests_failed: bool) -> Self {
        Self {
            events: Events::Present(events),
            is_test: true,
            tests_failed,
            ..Default::default()
        }
    }

    /// A result the service has not reported any output for yet.
    pub fn pending() -> Self {
        Self::default()
    }

    /// A result that terminated without output.
    pub fn terminated() -> Self {
        Self {
            events: Events::Null,
            ..Default::default()
        }
    }

    /// Decode a wire payload.
    ///
    /// Invalid JSON is reported as [`Error::Json`]; JSON that does not have
    /// the shape of an execution result is reported as
    /// [`Error::MalformedInput`].
    pub fn from_json(payload: &str) -> Result<Self> {
        serde_json::from_str(payload).map_err(classify_error)
    }

    /// Decode an already parsed wire payload.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(classify_error)
    }

    /// All event messages joined in order with no separator.
    pub fn concatenated_output(&self) -> Option<String> {
        self.events
            .as_slice()
            .map(|events| events.iter().map(|event| event.message.as_str()).collect())
    }
}

fn classify_error(err: serde_json::Error) -> Error {
    match err.classify() {
        Category::Data => Error::MalformedInput(err.to_string()),
        Category::Io | Category::Syntax | Category::Eof => Error::Json(err),
    }
}

/// Accepts both a boolean and the failure count some backends send.
fn deserialize_tests_failed<'de, D>(deserializer: D) -> core::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TestsFailed {
        Flag(bool),
        Count(u64),
    }

    Ok(match TestsFailed::deserialize(deserializer)? {
        TestsFailed::Flag(failed) => failed,
        TestsFailed::Count(count) => count > 0,
    })
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Stdout => write!(f, "stdout"),
            EventKind::Stderr => write!(f, "stderr"),
        }
    }
}

impl fmt::Display for ExecutionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_test { "Test run" } else { "Run" };
        match &self.events {
            Events::Absent => write!(f, "{kind} pending"),
            Events::Null => write!(f, "{kind} exited with status {} and no output", self.status),
            Events::Present(events) => write!(
                f,
                "{kind} exited with status {} and {} event(s)",
                self.status,
                events.len()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_events_is_absent() -> Result<()> {
        let result = ExecutionResult::from_json(r#"{"Status":0}"#)?;
        assert_eq!(result.events, Events::Absent);
        assert_eq!(result.concatenated_output(), None);
        Ok(())
    }

    #[test]
    fn null_events_is_null() -> Result<()> {
        let result = ExecutionResult::from_json(r#"{"Events":null,"Status":2}"#)?;
        assert_eq!(result.events, Events::Null);
        assert_eq!(result.status, 2);
        Ok(())
    }

    #[test]
    fn decodes_playground_payload() -> Result<()> {
        let payload = r#"{
            "Errors": "",
            "Events": [
                {"Message": "Hello, playground\n", "Kind": "stdout", "Delay": 0},
                {"Message": "Hello, playground, again!\n", "Kind": "stderr", "Delay": 20}
            ],
            "Status": 0,
            "IsTest": false,
            "TestsFailed": 0
        }"#;
        let result = ExecutionResult::from_json(payload)?;

        let events = result.events.as_slice().unwrap_or_default();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].kind, EventKind::Stderr);
        assert_eq!(events[1].delay_millis, Some(20));
        assert!(!result.tests_failed);
        assert_eq!(
            result.concatenated_output().as_deref(),
            Some("Hello, playground\nHello, playground, again!\n")
        );
        Ok(())
    }

    #[test]
    fn tests_failed_accepts_count_and_flag() -> Result<()> {
        let counted = ExecutionResult::from_json(r#"{"Events":[],"IsTest":true,"TestsFailed":3}"#)?;
        assert!(counted.tests_failed);

        let flagged =
            ExecutionResult::from_json(r#"{"Events":[],"IsTest":true,"TestsFailed":false}"#)?;
        assert!(!flagged.tests_failed);
        Ok(())
    }

    #[test]
    fn events_not_a_sequence_is_malformed() {
        let err = ExecutionResult::from_json(r#"{"Events":"oops"}"#).unwrap_err();
        assert!(matches!(err, Error::MalformedInput(_)), "{err:?}");
    }

    #[test]
    fn event_without_message_is_malformed() {
        let err = ExecutionResult::from_json(r#"{"Events":[{"Delay":3}]}"#).unwrap_err();
        assert!(matches!(err, Error::MalformedInput(_)), "{err:?}");
    }

    #[test]
    fn broken_json_is_a_json_error() {
        let err = ExecutionResult::from_json(r#"{"Events":["#).unwrap_err();
        assert!(matches!(err, Error::Json(_)), "{err:?}");
    }

    #[test]
    fn serializes_tri_state_events() -> Result<()> {
        let pending = serde_json::to_value(ExecutionResult::pending())?;
        assert!(pending.get("Events").is_none());

        let terminated = serde_json::to_value(ExecutionResult::terminated())?;
        assert_eq!(terminated.get("Events"), Some(&serde_json::Value::Null));
        Ok(())
    }
}
