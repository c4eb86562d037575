//! Annotated reconstruction: replay a change set over the original text.
//!
//! Changes are applied in descending position order so that splicing at one
//! offset never disturbs the offsets of changes still to be applied. The
//! persisted order of a change set is not assumed to be sorted.
//!
//! When several records share a position they are rendered in a fixed
//! order: the deleted span first, then every inserted span in the order the
//! records appear in the change set.
//!
//! Malformed records never abort reconstruction. Each one is skipped,
//! logged, and reported in [`AnnotatedText::warnings`] so the rest of the
//! amendment can still be reviewed.

use std::fmt;

use amend_types::Change;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// How a segment of reconstructed text is marked for display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Marker {
    /// Text common to the original and the proposal.
    Unchanged,
    /// Text added by the amendment (rendered underlined).
    Inserted,
    /// Text removed by the amendment (rendered struck through).
    Deleted,
}

/// A run of text with one marker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
    pub marker: Marker,
}

impl Segment {
    pub fn new(text: impl Into<String>, marker: Marker) -> Self {
        Self {
            text: text.into(),
            marker,
        }
    }
}

/// Why a change record was skipped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WarningKind {
    /// The position lies past the end of the original text.
    OutOfRange { len: usize },
    /// The position splits a multi-byte character.
    NotCharBoundary,
    /// The delete's text is not what the original holds at its position.
    TextMismatch { found: Option<String> },
    /// The delete reaches into a span already claimed by a later change.
    Overlap,
}

/// A change record that could not be rendered.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconstructWarning {
    /// Index of the record in the change set as given.
    pub index: usize,
    pub change: Change,
    pub kind: WarningKind,
}

impl fmt::Display for ReconstructWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "change #{} ({}) skipped: ", self.index, self.change)?;
        match &self.kind {
            WarningKind::OutOfRange { len } => write!(f, "position past end of {len}-byte text"),
            WarningKind::NotCharBoundary => write!(f, "position splits a character"),
            WarningKind::TextMismatch { found: Some(found) } => {
                write!(f, "original holds {found:?}")
            }
            WarningKind::TextMismatch { found: None } => write!(f, "original text too short"),
            WarningKind::Overlap => write!(f, "overlaps a later change"),
        }
    }
}

/// Original text with inserted and deleted spans marked, in reading order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedText {
    pub segments: Vec<Segment>,
    pub warnings: Vec<ReconstructWarning>,
}

impl AnnotatedText {
    /// The proposed text: unchanged and inserted segments.
    pub fn proposed_text(&self) -> String {
        self.collect(Marker::Inserted)
    }

    /// The base text: unchanged and deleted segments.
    pub fn original_text(&self) -> String {
        self.collect(Marker::Deleted)
    }

    /// Whether any segment is marked.
    pub fn has_changes(&self) -> bool {
        self.segments.iter().any(|s| s.marker != Marker::Unchanged)
    }

    /// Whether every change record was rendered.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    fn collect(&self, keep: Marker) -> String {
        self.segments
            .iter()
            .filter(|s| s.marker == Marker::Unchanged || s.marker == keep)
            .map(|s| s.text.as_str())
            .collect()
    }
}

/// Render `changes` over `original` as marked segments.
pub fn reconstruct(original: &str, changes: &[Change]) -> AnnotatedText {
    let mut order: Vec<usize> = (0..changes.len()).collect();
    // Stable: records at one position keep their persisted relative order.
    order.sort_by(|&a, &b| changes[b].position().cmp(&changes[a].position()));

    let mut reversed: Vec<Segment> = Vec::new();
    let mut warnings = Vec::new();
    let mut cursor = original.len();

    for group in order.chunk_by(|&a, &b| changes[a].position() == changes[b].position()) {
        let position = changes[group[0]].position();

        let invalid = if position > original.len() {
            Some(WarningKind::OutOfRange {
                len: original.len(),
            })
        } else if !original.is_char_boundary(position) {
            Some(WarningKind::NotCharBoundary)
        } else {
            None
        };
        if let Some(kind) = invalid {
            for &index in group {
                skip(&mut warnings, index, &changes[index], kind.clone());
            }
            continue;
        }

        let mut deleted: Option<&str> = None;
        let mut inserted: Vec<&str> = Vec::new();
        for &index in group {
            match &changes[index] {
                Change::Insert { text, .. } => inserted.push(text.as_str()),
                Change::Delete { text, .. } if text.is_empty() => {}
                Change::Delete { text, .. } => {
                    let end = position + text.len();
                    if deleted.is_some() || end > cursor {
                        let kind = if end > original.len() {
                            WarningKind::TextMismatch { found: None }
                        } else {
                            WarningKind::Overlap
                        };
                        skip(&mut warnings, index, &changes[index], kind);
                        continue;
                    }
                    match original.get(position..end) {
                        Some(found) if found == text.as_str() => deleted = Some(text.as_str()),
                        found => skip(
                            &mut warnings,
                            index,
                            &changes[index],
                            WarningKind::TextMismatch {
                                found: found.map(str::to_string),
                            },
                        ),
                    }
                }
            }
        }

        let consumed = position + deleted.map_or(0, str::len);
        reversed.push(Segment::new(&original[consumed..cursor], Marker::Unchanged));
        for text in inserted.iter().rev() {
            reversed.push(Segment::new(*text, Marker::Inserted));
        }
        if let Some(text) = deleted {
            reversed.push(Segment::new(text, Marker::Deleted));
        }
        cursor = position;
    }
    reversed.push(Segment::new(&original[..cursor], Marker::Unchanged));

    warnings.sort_by_key(|w: &ReconstructWarning| w.index);
    AnnotatedText {
        segments: coalesce(reversed.into_iter().rev()),
        warnings,
    }
}

/// Replay `changes` over `original` and return the proposed plain text.
pub fn apply_changes(original: &str, changes: &[Change]) -> String {
    reconstruct(original, changes).proposed_text()
}

fn skip(warnings: &mut Vec<ReconstructWarning>, index: usize, change: &Change, kind: WarningKind) {
    let warning = ReconstructWarning {
        index,
        change: change.clone(),
        kind,
    };
    warn!(%warning, "malformed change record");
    warnings.push(warning);
}

fn coalesce(segments: impl Iterator<Item = Segment>) -> Vec<Segment> {
    let mut out: Vec<Segment> = Vec::new();
    for segment in segments.filter(|s| !s.text.is_empty()) {
        match out.last_mut() {
            Some(last) if last.marker == segment.marker => last.text.push_str(&segment.text),
            _ => out.push(segment),
        }
    }
    out
}
