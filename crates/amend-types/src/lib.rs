//! Foundation types for legislative petition amendments.
//!
//! This crate provides the identity, reference-text and change types used
//! throughout the workspace. Every other `amend-*` crate depends on
//! `amend-types`.
//!
//! # Key Types
//!
//! - [`CitationLabel`] -- Human citation of a reference paragraph (e.g. `¶324`)
//! - [`ReferenceParagraph`] -- One unit of Book of Discipline text
//! - [`Change`] / [`ChangeSet`] -- Word-level edits anchored in original-text offsets
//! - [`Amendment`] -- Persisted `(original, modified, changes)` triple
//! - [`Petition`] / [`PetitionStatus`] -- Submission record and its lifecycle
//! - [`Committee`] / [`CommitteeVote`] -- Legislative committees and recorded votes

pub mod amendment;
pub mod change;
pub mod citation;
pub mod error;
pub mod id;
pub mod paragraph;
pub mod petition;

pub use amendment::{Amendment, AmendmentKind};
pub use change::{Change, ChangeSet};
pub use citation::CitationLabel;
pub use error::TypeError;
pub use id::{CommitteeId, ParagraphId, PetitionId, VoteId};
pub use paragraph::ReferenceParagraph;
pub use petition::{
    Approval, Committee, CommitteeVote, Petition, PetitionStatus, Submitter, VoteAction,
    VoteTally,
};
