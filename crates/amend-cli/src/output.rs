//! Formatting of annotated text and paragraphs for stdout.

use amend_diff::{AnnotatedText, Marker};
use amend_types::ReferenceParagraph;
use colored::Colorize;

/// Deleted text struck through in red, inserted text underlined in green.
/// Falls back to bracket markers when color is disabled.
pub fn terminal(annotated: &AnnotatedText) -> String {
    if !colored::control::SHOULD_COLORIZE.should_colorize() {
        return annotated.to_bracketed();
    }
    annotated
        .segments
        .iter()
        .map(|segment| match segment.marker {
            Marker::Unchanged => segment.text.normal().to_string(),
            Marker::Inserted => segment.text.green().underline().to_string(),
            Marker::Deleted => segment.text.red().strikethrough().to_string(),
        })
        .collect()
}

pub fn summary(annotated: &AnnotatedText) -> String {
    let count = |marker: Marker| {
        annotated
            .segments
            .iter()
            .filter(|s| s.marker == marker)
            .count()
    };
    format!(
        "{} inserted, {} deleted",
        count(Marker::Inserted),
        count(Marker::Deleted)
    )
}

pub fn paragraph_line(paragraph: &ReferenceParagraph) -> String {
    let mut line = format!("{}  {}", paragraph.number.as_str().yellow().bold(), paragraph.title);
    if !paragraph.section.is_empty() {
        line.push_str(&format!("  {}", paragraph.section.dimmed()));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use amend_diff::Segment;

    fn sample() -> AnnotatedText {
        AnnotatedText {
            segments: vec![
                Segment::new("The ", Marker::Unchanged),
                Segment::new("cat", Marker::Deleted),
                Segment::new("dog", Marker::Inserted),
                Segment::new(" sat", Marker::Unchanged),
            ],
            warnings: Vec::new(),
        }
    }

    #[test]
    fn uncolored_output_uses_brackets() {
        colored::control::set_override(false);
        assert_eq!(terminal(&sample()), "The [deleted:cat][inserted:dog] sat");
    }

    #[test]
    fn summary_counts_marked_segments() {
        assert_eq!(summary(&sample()), "1 inserted, 1 deleted");
        assert_eq!(summary(&AnnotatedText::default()), "0 inserted, 0 deleted");
    }
}
