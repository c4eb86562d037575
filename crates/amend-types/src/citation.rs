//! Citation labels for reference paragraphs.
//!
//! Labels are how petitions refer to the Book of Discipline: `¶324`,
//! `¶2702.1`. Submitters type them in many shapes (`Para. 324`,
//! `paragraph 324`, ` ¶ 324 `), so parsing canonicalizes numeric labels
//! to the `¶N` form. Non-numeric labels are kept verbatim (trimmed).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

const PILCROW: char = '¶';
const PREFIXES: [&str; 4] = ["paragraph", "para.", "para", "par."];

/// Canonical citation label, unique among active paragraphs.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CitationLabel(String);

impl CitationLabel {
    /// Parse and canonicalize a label.
    pub fn parse(input: &str) -> Result<Self, TypeError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(TypeError::InvalidCitation(input.to_string()));
        }

        let rest = strip_prefix(trimmed);
        if is_numeric_reference(rest) {
            return Ok(Self(format!("{PILCROW}{rest}")));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The canonical label text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The numeric part of a `¶N` label, if the label is numeric.
    pub fn number(&self) -> Option<&str> {
        self.0
            .strip_prefix(PILCROW)
            .filter(|rest| is_numeric_reference(rest))
    }
}

fn strip_prefix(label: &str) -> &str {
    if let Some(rest) = label.strip_prefix(PILCROW) {
        return rest.trim_start();
    }
    let lower = label.to_ascii_lowercase();
    for prefix in PREFIXES {
        if lower.starts_with(prefix) {
            // ASCII prefixes, so the byte offset is valid in `label` too.
            return label[prefix.len()..].trim_start();
        }
    }
    label
}

fn is_numeric_reference(s: &str) -> bool {
    !s.is_empty()
        && s.starts_with(|c: char| c.is_ascii_digit())
        && s.chars().all(|c| c.is_ascii_digit() || c == '.')
        && !s.ends_with('.')
}

impl FromStr for CitationLabel {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CitationLabel {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CitationLabel> for String {
    fn from(label: CitationLabel) -> Self {
        label.0
    }
}

impl fmt::Debug for CitationLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CitationLabel({})", self.0)
    }
}

impl fmt::Display for CitationLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn canonical_label_is_unchanged() {
        assert_eq!(CitationLabel::parse("¶324").unwrap().as_str(), "¶324");
    }

    #[test]
    fn prefixes_are_normalized() {
        for input in ["Para. 324", "paragraph 324", "  ¶ 324 ", "324", "PAR. 324"] {
            assert_eq!(CitationLabel::parse(input).unwrap().as_str(), "¶324", "{input}");
        }
    }

    #[test]
    fn sub_paragraphs_are_numeric() {
        let label = CitationLabel::parse("Para 2702.1").unwrap();
        assert_eq!(label.as_str(), "¶2702.1");
        assert_eq!(label.number(), Some("2702.1"));
    }

    #[test]
    fn non_numeric_labels_are_kept() {
        let label = CitationLabel::parse(" Social Principles ").unwrap();
        assert_eq!(label.as_str(), "Social Principles");
        assert_eq!(label.number(), None);
    }

    #[test]
    fn empty_label_is_rejected() {
        assert!(matches!(
            CitationLabel::parse("   "),
            Err(TypeError::InvalidCitation(_))
        ));
    }

    #[test]
    fn serde_canonicalizes_on_read() {
        let label: CitationLabel = serde_json::from_str("\"Para. 161\"").unwrap();
        assert_eq!(label.as_str(), "¶161");
        assert_eq!(serde_json::to_string(&label).unwrap(), "\"¶161\"");
    }

    proptest! {
        #[test]
        fn parsing_is_idempotent(input in "(¶|Para\\. |paragraph )?[0-9a-z. ]{0,12}") {
            prop_assume!(!input.trim().is_empty());
            let label = CitationLabel::parse(&input).unwrap();
            prop_assert_eq!(CitationLabel::parse(label.as_str()).unwrap(), label);
        }
    }
}
