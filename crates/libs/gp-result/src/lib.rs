//! Execution-result reconciliation for the gp playground widget.
//!
//! The playground widget submits code to a remote execution service and
//! renders whatever that service reports back. This crate turns one reported
//! [`ExecutionResult`] snapshot into a [`ReconciledPresentation`]: an outcome
//! classification, the ordered output lines with their timing annotations,
//! and an expected-output block when the output did not match.
//!
//! # Usage
//!
//! ```rust
//! use gp_result::{ExecutionResult, Outcome, ReconciliationInput, reconcile};
//!
//! let result = ExecutionResult::from_json(
//!     r#"{"Events":[{"Message":"Hello, playground\n","Kind":"stdout","Delay":0}],"Status":0}"#,
//! )
//! .unwrap();
//!
//! let input = ReconciliationInput {
//!     expected: Some(String::from("Hello, playground\n")),
//!     ..Default::default()
//! };
//!
//! let presentation = reconcile(&result, &input);
//! assert_eq!(presentation.outcome, Outcome::RunSuccess);
//! ```

pub mod config;
pub mod error;
pub mod execution;
pub mod prelude;
pub mod presentation;
pub mod reconcile;
pub mod session;

pub use config::GpConfig;
pub use execution::{Event, EventKind, Events, ExecutionResult};
pub use reconcile::{
    Height, Line, MismatchBlock, Outcome, ReconciledPresentation, ReconciliationInput,
    format_delay, reconcile,
};
pub use session::{ResultSession, ResultUpdate, SessionState};
