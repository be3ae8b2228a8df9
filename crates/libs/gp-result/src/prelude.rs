//! Common types and utilities.

/// Reconciliation error type.
pub use crate::error::Error;

/// Reconciliation result type.
pub type Result<T> = core::result::Result<T, Error>;
