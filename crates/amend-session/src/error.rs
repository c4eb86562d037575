use thiserror::Error;

use crate::session::SessionState;

/// Boxed error returned by an [`AmendmentSink`](crate::AmendmentSink).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("cannot {operation} while {state}")]
    InvalidState {
        operation: &'static str,
        state: SessionState,
    },

    #[error("the paragraph was not amended: no changes to submit")]
    NoChanges,

    #[error("persistence failed: {0}")]
    Persistence(#[source] BoxError),
}

pub type SessionResult<T> = Result<T, SessionError>;
