//! Amendment engine for reference-paragraph petitions.
//!
//! A submitter edits a paragraph in place; this crate turns the
//! `(original, edited)` pair into a persisted list of word-level changes and
//! later re-renders that list over the original text for committee review.
//!
//! # Key Types
//!
//! - [`Span`] / [`SpanKind`] -- Word-level diff output ([`diff_words`])
//! - [`derive_changes`] -- Spans to a [`ChangeSet`](amend_types::ChangeSet) in original-text offsets
//! - [`AnnotatedText`] / [`Segment`] / [`Marker`] -- Reconstruction output ([`reconstruct`])
//! - [`ReconstructWarning`] -- A change record that could not be rendered
//!
//! # Positions
//!
//! All offsets are byte offsets into the original text and always fall on
//! UTF-8 character boundaries when produced by [`derive_changes`].

pub mod derive;
pub mod error;
pub mod reconstruct;
pub mod render;
pub mod word;

pub use derive::{changes_from_spans, derive_changes, validate_changes, verify_amendment};
pub use error::{DiffError, DiffResult};
pub use reconstruct::{
    apply_changes, reconstruct, AnnotatedText, Marker, ReconstructWarning, Segment, WarningKind,
};
pub use render::escape_html;
pub use word::{diff_words, tokenize, Span, SpanKind};
