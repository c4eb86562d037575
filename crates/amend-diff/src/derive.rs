//! Change-list derivation: word spans to positioned change records.
//!
//! Spans are walked left to right with a running offset into the original
//! text. `Equal` and `Removed` spans consume original text; `Added` spans do
//! not. A delete is positioned where its removed text starts. An insert is
//! anchored at the end of the preceding unchanged run, so a replacement
//! yields a delete and an insert sharing one position:
//!
//! ```text
//! "more than six years" -> "more than ten years"
//!   Delete { text: "six", position: 10 }
//!   Insert { text: "ten", position: 10 }
//! ```

use amend_types::{Amendment, Change, ChangeSet};
use tracing::debug;

use crate::error::{DiffError, DiffResult};
use crate::reconstruct::apply_changes;
use crate::word::{diff_words, Span, SpanKind};

/// Derive the change set that turns `original` into `edited`.
///
/// Returns an empty set when the texts are equal.
pub fn derive_changes(original: &str, edited: &str) -> ChangeSet {
    let spans = diff_words(original, edited);
    let changes = changes_from_spans(&spans);
    debug!(
        spans = spans.len(),
        insertions = changes.insertions(),
        deletions = changes.deletions(),
        "derived change set"
    );
    changes
}

/// Convert diff spans into change records in original-text offsets.
pub fn changes_from_spans(spans: &[Span]) -> ChangeSet {
    let mut changes = ChangeSet::new();
    let mut offset = 0usize;
    let mut anchor = 0usize;

    for span in spans {
        match span.kind {
            SpanKind::Equal => {
                offset += span.value.len();
                anchor = offset;
            }
            SpanKind::Removed => {
                changes.push(Change::delete(span.value.clone(), offset));
                offset += span.value.len();
            }
            SpanKind::Added => changes.push(Change::insert(span.value.clone(), anchor)),
        }
    }
    changes
}

/// Check every record against `original` without rendering.
///
/// Fails on the first delete whose text is not found at its position, and
/// on any position beyond the end of the text or inside a UTF-8 character.
pub fn validate_changes(original: &str, changes: &[Change]) -> DiffResult<()> {
    for (index, change) in changes.iter().enumerate() {
        let position = change.position();
        if position > original.len() {
            return Err(DiffError::MalformedChange {
                index,
                reason: format!(
                    "position {position} is past the end of the text ({} bytes)",
                    original.len()
                ),
            });
        }
        if !original.is_char_boundary(position) {
            return Err(DiffError::MalformedChange {
                index,
                reason: format!("position {position} is inside a character"),
            });
        }
        if let Change::Delete { text, .. } = change {
            let found = original.get(position..position + text.len());
            if found != Some(text.as_str()) {
                return Err(DiffError::MalformedChange {
                    index,
                    reason: format!("expected {text:?} at {position}, found {found:?}"),
                });
            }
        }
    }
    Ok(())
}

/// Validate an amendment and check that its changes reproduce
/// `modified_text` when replayed over `original_text`.
pub fn verify_amendment(amendment: &Amendment) -> DiffResult<()> {
    validate_changes(&amendment.original_text, amendment.changes.as_slice())?;
    let replayed = apply_changes(&amendment.original_text, amendment.changes.as_slice());
    if replayed != amendment.modified_text {
        return Err(DiffError::RoundTripMismatch {
            expected_len: amendment.modified_text.len(),
            actual_len: replayed.len(),
        });
    }
    Ok(())
}
