use thiserror::Error;

use crate::petition::PetitionStatus;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid citation label: {0:?}")]
    InvalidCitation(String),

    #[error("invalid petition transition: {from} -> {to}")]
    InvalidTransition {
        from: PetitionStatus,
        to: PetitionStatus,
    },

    #[error("invalid identifier: {0}")]
    InvalidId(String),
}
