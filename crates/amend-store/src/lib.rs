//! Storage for the petition workflow.
//!
//! Persistence sits outside the amendment engine: the engine reads
//! [`ReferenceParagraph`](amend_types::ReferenceParagraph)s and hands back
//! [`Amendment`](amend_types::Amendment) payloads. This crate defines that
//! boundary as traits and ships an in-memory backend.
//!
//! # Storage Backends
//!
//! All backends implement [`ParagraphStore`] and [`PetitionStore`]:
//!
//! - [`InMemoryStore`] -- `HashMap`-based store for tests, the CLI and embedding
//!
//! # Design Rules
//!
//! 1. A citation label identifies at most one paragraph; inserting a second
//!    paragraph with the same label fails.
//! 2. Committee names and abbreviations are unique.
//! 3. Amendments are stored as submitted and never rewritten.
//! 4. Lookups of missing records return `Ok(None)`; updates of missing
//!    records fail with [`StoreError::NotFound`].

pub mod codec;
pub mod error;
pub mod memory;
pub mod traits;

pub use codec::{decode_amendment, decode_changes, decode_paragraphs, encode_amendment};
pub use error::{StoreError, StoreResult};
pub use memory::InMemoryStore;
pub use traits::{ParagraphStore, PetitionStore};
