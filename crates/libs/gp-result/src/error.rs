//! Reconciliation error types.

/// Errors raised at the boundaries of the reconciler.
///
/// The reconciler itself never fails; these come from decoding wire payloads,
/// loading configuration and driving a [`crate::session::ResultSession`].
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed.
    #[error(transparent)]
    IO(#[from] std::io::Error),

    /// Payload is not valid JSON.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Payload is JSON but does not have the shape of an execution result.
    #[error("Malformed execution result: {0}")]
    MalformedInput(String),

    /// TOML deserialization failed.
    #[error(transparent)]
    Deserialization(#[from] toml::de::Error),

    /// An update arrived before any code was submitted.
    #[error("No submission in progress")]
    NoSubmission,

    /// An update arrived after the current submission already settled.
    #[error("Submission already settled")]
    SubmissionSettled,
}
