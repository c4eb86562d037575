//! Atomic edits relative to a fixed base text.
//!
//! Every [`Change`] carries a byte offset into the *original* text. For a
//! delete, `text` is exactly `original[position..position + text.len()]`.
//! For an insert, `position` is where the new text is spliced in when the
//! change set is replayed over the original.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single insertion or deletion anchored in original-text coordinates.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Change {
    /// New text spliced in at `position`.
    Insert { text: String, position: usize },
    /// Original text removed, starting at `position`.
    Delete { text: String, position: usize },
}

impl Change {
    pub fn insert(text: impl Into<String>, position: usize) -> Self {
        Self::Insert {
            text: text.into(),
            position,
        }
    }

    pub fn delete(text: impl Into<String>, position: usize) -> Self {
        Self::Delete {
            text: text.into(),
            position,
        }
    }

    /// Offset into the original text.
    pub fn position(&self) -> usize {
        match self {
            Self::Insert { position, .. } | Self::Delete { position, .. } => *position,
        }
    }

    /// Inserted or removed text.
    pub fn text(&self) -> &str {
        match self {
            Self::Insert { text, .. } | Self::Delete { text, .. } => text,
        }
    }

    pub fn is_insert(&self) -> bool {
        matches!(self, Self::Insert { .. })
    }

    pub fn is_delete(&self) -> bool {
        matches!(self, Self::Delete { .. })
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Insert { text, position } => write!(f, "+{position} {text:?}"),
            Self::Delete { text, position } => write!(f, "-{position} {text:?}"),
        }
    }
}

/// The changes produced by one edit session, in derivation order.
///
/// Storage order is *not* position order; consumers that replay changes
/// must sort a copy themselves.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeSet {
    changes: Vec<Change>,
}

impl ChangeSet {
    /// Create an empty change set.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, change: Change) {
        self.changes.push(change);
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Change> {
        self.changes.iter()
    }

    pub fn as_slice(&self) -> &[Change] {
        &self.changes
    }

    pub fn into_vec(self) -> Vec<Change> {
        self.changes
    }

    /// Number of insert records.
    pub fn insertions(&self) -> usize {
        self.changes.iter().filter(|c| c.is_insert()).count()
    }

    /// Number of delete records.
    pub fn deletions(&self) -> usize {
        self.changes.iter().filter(|c| c.is_delete()).count()
    }

    /// Total bytes of inserted text.
    pub fn inserted_len(&self) -> usize {
        self.changes
            .iter()
            .filter(|c| c.is_insert())
            .map(|c| c.text().len())
            .sum()
    }

    /// Total bytes of removed text.
    pub fn deleted_len(&self) -> usize {
        self.changes
            .iter()
            .filter(|c| c.is_delete())
            .map(|c| c.text().len())
            .sum()
    }
}

impl From<Vec<Change>> for ChangeSet {
    fn from(changes: Vec<Change>) -> Self {
        Self { changes }
    }
}

impl FromIterator<Change> for ChangeSet {
    fn from_iter<I: IntoIterator<Item = Change>>(iter: I) -> Self {
        Self {
            changes: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ChangeSet {
    type Item = Change;
    type IntoIter = std::vec::IntoIter<Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}

impl<'a> IntoIterator for &'a ChangeSet {
    type Item = &'a Change;
    type IntoIter = std::slice::Iter<'a, Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_shape_is_tagged() {
        let json = serde_json::to_value(Change::delete("six", 62)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "delete", "text": "six", "position": 62})
        );
    }

    #[test]
    fn delete_without_text_is_rejected() {
        let result: Result<Change, _> =
            serde_json::from_str(r#"{"type": "delete", "position": 3}"#);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_type_is_rejected() {
        let result: Result<Change, _> =
            serde_json::from_str(r#"{"type": "replace", "text": "x", "position": 3}"#);
        assert!(result.is_err());
    }

    #[test]
    fn change_set_counts() {
        let set: ChangeSet = vec![
            Change::delete("six", 62),
            Change::insert("ten", 62),
            Change::insert(", and", 80),
        ]
        .into();
        assert_eq!(set.len(), 3);
        assert_eq!(set.insertions(), 2);
        assert_eq!(set.deletions(), 1);
        assert_eq!(set.inserted_len(), 8);
        assert_eq!(set.deleted_len(), 3);
    }

    #[test]
    fn change_set_serializes_as_array() {
        let set: ChangeSet = vec![Change::insert("a", 0)].into();
        let json = serde_json::to_string(&set).unwrap();
        assert!(json.starts_with('['));
    }

    #[test]
    fn display_is_compact() {
        assert_eq!(Change::insert("ten", 4).to_string(), "+4 \"ten\"");
        assert_eq!(Change::delete("six", 4).to_string(), "-4 \"six\"");
    }
}
