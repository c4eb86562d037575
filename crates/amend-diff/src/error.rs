//! Error types for the amendment engine.

/// Errors from strict validation of change sets.
///
/// Rendering never fails on bad records (see
/// [`ReconstructWarning`](crate::ReconstructWarning)); these errors come from
/// the explicit validation entry points used before persisting.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiffError {
    /// A change record does not fit the original text.
    #[error("malformed change #{index}: {reason}")]
    MalformedChange { index: usize, reason: String },

    /// Replaying the changes over the original does not yield the stored
    /// modified text.
    #[error("changes do not reproduce the modified text (expected {expected_len} bytes, got {actual_len})")]
    RoundTripMismatch {
        expected_len: usize,
        actual_len: usize,
    },
}

/// Convenience alias for engine results.
pub type DiffResult<T> = Result<T, DiffError>;
