use amend_diff::DiffError;
use amend_session::SessionError;
use amend_store::StoreError;
use amend_types::{PetitionId, PetitionStatus, TypeError, VoteId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("paragraph not found: {0}")]
    ParagraphNotFound(String),

    #[error("petition not found: {0}")]
    PetitionNotFound(PetitionId),

    #[error("committee not found: {0}")]
    CommitteeNotFound(String),

    #[error("vote not found: {0}")]
    VoteNotFound(VoteId),

    #[error("petition {petition} is {status} and has no committee")]
    NotAssigned {
        petition: PetitionId,
        status: PetitionStatus,
    },

    #[error("vote {0} is already approved")]
    AlreadyApproved(VoteId),

    #[error("paragraph {label} changed since the session opened")]
    StaleParagraph { label: String },

    #[error("invalid petition: {0}")]
    InvalidDraft(String),

    #[error("type error: {0}")]
    Types(#[from] TypeError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("session error: {0}")]
    Session(#[from] SessionError),

    #[error("amendment error: {0}")]
    Diff(#[from] DiffError),
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;
