//! The petition workflow around amendment editing.
//!
//! [`Workflow`] ties the pieces together over any backend implementing
//! [`ParagraphStore`](amend_store::ParagraphStore) and
//! [`PetitionStore`](amend_store::PetitionStore):
//!
//! 1. a submitter opens an [`EditSession`](amend_session::EditSession) on a
//!    paragraph and submits it with a [`PetitionDraft`];
//! 2. the secretary assigns the petition to a committee;
//! 3. the recorder enters committee votes and approves them;
//! 4. reviewers read the reconstructed amendment with [`Workflow::review`].

pub mod draft;
pub mod error;
pub mod workflow;

pub use draft::PetitionDraft;
pub use error::{WorkflowError, WorkflowResult};
pub use workflow::Workflow;
