use std::fmt;

use serde::{Deserialize, Serialize};

use crate::change::ChangeSet;

/// The amendment carried by a petition.
///
/// `modified_text` is stored alongside `changes` rather than recomputed,
/// so reviewers see exactly what was submitted even if reconstruction
/// logic changes later. Immutable once the petition is submitted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amendment {
    pub original_text: String,
    pub modified_text: String,
    pub changes: ChangeSet,
}

/// Committee classification of an amendment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmendmentKind {
    /// Only insertions.
    Addition,
    /// Only deletions.
    Deletion,
    /// Both insertions and deletions.
    Substitution,
}

impl Amendment {
    pub fn new(
        original_text: impl Into<String>,
        modified_text: impl Into<String>,
        changes: ChangeSet,
    ) -> Self {
        Self {
            original_text: original_text.into(),
            modified_text: modified_text.into(),
            changes,
        }
    }

    /// Classify by the kinds of changes present. `None` for an empty set.
    pub fn kind(&self) -> Option<AmendmentKind> {
        match (self.changes.insertions() > 0, self.changes.deletions() > 0) {
            (true, true) => Some(AmendmentKind::Substitution),
            (true, false) => Some(AmendmentKind::Addition),
            (false, true) => Some(AmendmentKind::Deletion),
            (false, false) => None,
        }
    }
}

impl fmt::Display for AmendmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Addition => write!(f, "addition"),
            Self::Deletion => write!(f, "deletion"),
            Self::Substitution => write!(f, "substitution"),
        }
    }
}
