//! Per-widget result session.
//!
//! The reconciler only ever sees complete snapshots. A [`ResultSession`] sits
//! in front of it for one widget: it merges the incremental updates of the
//! current submission into a snapshot, reconciles it after every update and
//! tracks the submission lifecycle:
//!
//! ```text
//! NoResult --submit--> Pending --finished--> Settled(outcome)
//!     ^                   |                        |
//!     +------------------ submit <-----------------+
//! ```
//!
//! A settled submission never goes back to `Pending` on its own; only a new
//! [`ResultSession::submit`] does.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    execution::{Event, Events, ExecutionResult},
    prelude::*,
    reconcile::{Outcome, ReconciledPresentation, ReconciliationInput, reconcile},
};

/// Lifecycle of the current submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "outcome", rename_all = "snake_case")]
pub enum SessionState {
    /// Nothing was submitted yet.
    NoResult,
    /// A submission is running and accepts updates.
    Pending,
    /// The submission finished with the given outcome.
    Settled(Outcome),
}

/// Update reported by the execution service for the current submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ResultUpdate {
    /// Replace the whole result. Settles the submission unless execution is
    /// still `loading` or the snapshot has no events yet.
    Snapshot {
        result: ExecutionResult,
        #[serde(default)]
        loading: bool,
    },
    /// Append a chunk of output events.
    Events(Vec<Event>),
    /// Execution finished; seals the submission.
    Finished {
        #[serde(default)]
        is_test: bool,
        #[serde(default)]
        tests_failed: bool,
        #[serde(default)]
        status: i32,
    },
    /// Execution terminated without producing any output.
    NoOutput {
        #[serde(default)]
        status: i32,
    },
}

/// Result pane state of one widget.
#[derive(Debug, Clone)]
pub struct ResultSession {
    input: ReconciliationInput,
    submission: Option<Uuid>,
    result: ExecutionResult,
    state: SessionState,
}

impl ResultSession {
    /// Create a session rendering with `input`. The `loading` flag of
    /// `input` is managed by the session.
    pub fn new(input: ReconciliationInput) -> Self {
        Self {
            input: ReconciliationInput {
                loading: false,
                ..input
            },
            submission: None,
            result: ExecutionResult::pending(),
            state: SessionState::NoResult,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn submission_id(&self) -> Option<Uuid> {
        self.submission
    }

    /// Snapshot merged from the updates of the current submission.
    pub fn result(&self) -> &ExecutionResult {
        &self.result
    }

    /// Replace the expected output used from the next reconcile on.
    pub fn set_expected(&mut self, expected: Option<String>) {
        self.input.expected = expected;
    }

    /// Start a new submission, discarding whatever the previous one reported.
    pub fn submit(&mut self) -> Uuid {
        let id = Uuid::new_v4();
        debug!(%id, previous = ?self.submission, "Submission started");
        self.submission = Some(id);
        self.result = ExecutionResult::pending();
        self.state = SessionState::Pending;
        id
    }

    /// Merge `update` into the current submission and reconcile the result.
    pub fn apply(&mut self, update: ResultUpdate) -> Result<ReconciledPresentation> {
        match self.state {
            SessionState::Pending => {}
            SessionState::NoResult => {
                warn!("Dropping update received before any submission");
                return Err(Error::NoSubmission);
            }
            SessionState::Settled(outcome) => {
                warn!(id = ?self.submission, %outcome, "Dropping update for a settled submission");
                return Err(Error::SubmissionSettled);
            }
        }

        let settles = match update {
            ResultUpdate::Snapshot { result, loading } => {
                self.result = result;
                !loading && !self.result.events.is_absent()
            }
            ResultUpdate::Events(chunk) => {
                match &mut self.result.events {
                    Events::Present(events) => events.extend(chunk),
                    events => *events = Events::Present(chunk),
                }
                false
            }
            ResultUpdate::Finished {
                is_test,
                tests_failed,
                status,
            } => {
                if self.result.events.is_absent() {
                    self.result.events = Events::Null;
                }
                self.result.is_test = is_test;
                self.result.tests_failed = tests_failed;
                self.result.status = status;
                true
            }
            ResultUpdate::NoOutput { status } => {
                self.result.events = Events::Null;
                self.result.status = status;
                true
            }
        };

        let presentation = self.reconcile_with(!settles);
        if settles {
            debug!(id = ?self.submission, outcome = %presentation.outcome, "Submission settled");
            self.state = SessionState::Settled(presentation.outcome);
        }
        Ok(presentation)
    }

    /// Reconcile the current snapshot.
    pub fn presentation(&self) -> ReconciledPresentation {
        self.reconcile_with(self.state == SessionState::Pending)
    }

    fn reconcile_with(&self, loading: bool) -> ReconciledPresentation {
        let input = ReconciliationInput {
            loading,
            ..self.input.clone()
        };
        reconcile(&self.result, &input)
    }
}
