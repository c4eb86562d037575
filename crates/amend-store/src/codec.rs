//! JSON encoding of amendment payloads and paragraph corpora.
//!
//! Amendments are written in one shape:
//!
//! ```json
//! {
//!   "original_text": "...",
//!   "modified_text": "...",
//!   "changes": [{"type": "delete", "text": "six", "position": 62}]
//! }
//! ```
//!
//! Reading also accepts the legacy record shape, where the change text lives
//! in `originalText` (deletes) or `newText` (inserts) and the paragraph
//! texts are `originalParagraphText`/`modifiedParagraphText`. Legacy records
//! are converted to [`Change`] here, so a delete without text never gets past
//! the decoder.

use amend_types::{Amendment, Change, ChangeSet, CitationLabel, ParagraphId, ReferenceParagraph};
use serde::Deserialize;

use crate::error::{StoreError, StoreResult};

#[derive(Deserialize)]
#[serde(rename_all = "lowercase")]
enum WireKind {
    Insert,
    Delete,
}

#[derive(Deserialize)]
struct WireChange {
    #[serde(rename = "type")]
    kind: WireKind,
    #[serde(default)]
    text: Option<String>,
    #[serde(default, rename = "originalText")]
    original_text: Option<String>,
    #[serde(default, rename = "newText")]
    new_text: Option<String>,
    position: usize,
}

#[derive(Deserialize)]
struct WireAmendment {
    #[serde(alias = "originalParagraphText")]
    original_text: String,
    #[serde(alias = "modifiedParagraphText")]
    modified_text: String,
    #[serde(alias = "amendmentData")]
    changes: Vec<WireChange>,
}

#[derive(Deserialize)]
struct WireParagraph {
    #[serde(default)]
    id: Option<ParagraphId>,
    number: CitationLabel,
    title: String,
    #[serde(default)]
    section: String,
    current_text: String,
}

/// Serialize an amendment payload as pretty-printed JSON.
pub fn encode_amendment(amendment: &Amendment) -> StoreResult<String> {
    Ok(serde_json::to_string_pretty(amendment)?)
}

/// Parse an amendment payload (current or legacy shape).
pub fn decode_amendment(json: &str) -> StoreResult<Amendment> {
    let wire: WireAmendment = serde_json::from_str(json)?;
    Ok(Amendment {
        original_text: wire.original_text,
        modified_text: wire.modified_text,
        changes: convert_changes(wire.changes)?,
    })
}

/// Parse a bare JSON array of change records (current or legacy shape).
pub fn decode_changes(json: &str) -> StoreResult<ChangeSet> {
    let wire: Vec<WireChange> = serde_json::from_str(json)?;
    convert_changes(wire)
}

/// Parse a paragraph corpus: a JSON array of
/// `{id?, number, title, section?, current_text}` objects. Records without
/// an `id` get a fresh one.
pub fn decode_paragraphs(json: &str) -> StoreResult<Vec<ReferenceParagraph>> {
    let wire: Vec<WireParagraph> = serde_json::from_str(json)?;
    Ok(wire
        .into_iter()
        .map(|p| ReferenceParagraph {
            id: p.id.unwrap_or_default(),
            number: p.number,
            title: p.title,
            section: p.section,
            current_text: p.current_text,
        })
        .collect())
}

fn convert_changes(wire: Vec<WireChange>) -> StoreResult<ChangeSet> {
    wire.into_iter()
        .enumerate()
        .map(|(index, record)| {
            let (text, expected) = match record.kind {
                WireKind::Insert => (record.text.or(record.new_text), "newText"),
                WireKind::Delete => (record.text.or(record.original_text), "originalText"),
            };
            let text = text.ok_or_else(|| {
                StoreError::Serialization(format!(
                    "change #{index}: missing `text` (or legacy `{expected}`)"
                ))
            })?;
            Ok(match record.kind {
                WireKind::Insert => Change::insert(text, record.position),
                WireKind::Delete => Change::delete(text, record.position),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_then_decode() {
        let amendment = Amendment::new(
            "more than six years",
            "more than ten years",
            vec![Change::delete("six", 10), Change::insert("ten", 10)].into(),
        );
        let json = encode_amendment(&amendment).unwrap();
        assert!(json.contains("\"original_text\""));
        assert!(json.contains("\"type\": \"delete\""));
        assert_eq!(decode_amendment(&json).unwrap(), amendment);
    }

    #[test]
    fn legacy_records_are_accepted() {
        let json = r#"{
            "originalParagraphText": "The cat sat",
            "modifiedParagraphText": "The dog sat",
            "amendmentData": [
                {"type": "delete", "originalText": "cat", "position": 4},
                {"type": "insert", "newText": "dog", "position": 4}
            ]
        }"#;
        let amendment = decode_amendment(json).unwrap();
        assert_eq!(amendment.original_text, "The cat sat");
        assert_eq!(
            amendment.changes.as_slice(),
            &[Change::delete("cat", 4), Change::insert("dog", 4)]
        );
    }

    #[test]
    fn delete_without_text_is_rejected() {
        let err = decode_changes(r#"[{"type": "delete", "position": 4}]"#).unwrap_err();
        match err {
            StoreError::Serialization(msg) => assert!(msg.contains("originalText")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn legacy_field_on_wrong_kind_is_rejected() {
        // `newText` is meaningless on a delete.
        assert!(decode_changes(r#"[{"type": "delete", "newText": "x", "position": 0}]"#).is_err());
    }

    #[test]
    fn malformed_json_is_a_serialization_error() {
        assert!(matches!(
            decode_amendment("{not json"),
            Err(StoreError::Serialization(_))
        ));
    }

    #[test]
    fn corpus_records_get_ids() {
        let json = r#"[
            {"number": "Para. 324", "title": "Term Limits", "current_text": "No pastor..."},
            {"number": "¶160", "title": "The Natural World", "section": "Social Principles",
             "current_text": "All creation is the Lord's."}
        ]"#;
        let paragraphs = decode_paragraphs(json).unwrap();
        assert_eq!(paragraphs.len(), 2);
        assert_eq!(paragraphs[0].number.as_str(), "¶324");
        assert_eq!(paragraphs[0].section, "");
        assert_ne!(paragraphs[0].id, paragraphs[1].id);
    }
}
