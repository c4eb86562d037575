use serde::{Deserialize, Serialize};

use crate::citation::CitationLabel;
use crate::id::ParagraphId;

/// A unit of reference text that petitions amend.
///
/// Paragraphs are administered out of band and are read-only from the point
/// of view of an edit session. The citation label is expected to be unique
/// among active paragraphs; the storage backend enforces this.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceParagraph {
    pub id: ParagraphId,
    pub number: CitationLabel,
    pub title: String,
    pub section: String,
    pub current_text: String,
}

impl ReferenceParagraph {
    /// Create a paragraph with a fresh ID.
    pub fn new(
        number: CitationLabel,
        title: impl Into<String>,
        section: impl Into<String>,
        current_text: impl Into<String>,
    ) -> Self {
        Self {
            id: ParagraphId::new(),
            number,
            title: title.into(),
            section: section.into(),
            current_text: current_text.into(),
        }
    }

    /// Case-insensitive match against the label, title and text.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.number.as_str().to_lowercase().contains(&query)
            || self.title.to_lowercase().contains(&query)
            || self.current_text.to_lowercase().contains(&query)
    }
}
