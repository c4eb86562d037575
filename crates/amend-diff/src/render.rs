//! Text renderings of an [`AnnotatedText`].
//!
//! User-typed text is never emitted as markup: [`AnnotatedText::to_html`]
//! escapes every segment before wrapping it in `<ins>`/`<del>`.

use std::borrow::Cow;

use crate::reconstruct::{AnnotatedText, Marker};

/// Escape `&`, `<`, `>`, `"` and `'` for HTML text and attribute contexts.
pub fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

impl AnnotatedText {
    /// HTML fragment with `<del>` for removed and `<ins>` for added text.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            let text = escape_html(&segment.text);
            match segment.marker {
                Marker::Unchanged => out.push_str(&text),
                Marker::Inserted => {
                    out.push_str("<ins>");
                    out.push_str(&text);
                    out.push_str("</ins>");
                }
                Marker::Deleted => {
                    out.push_str("<del>");
                    out.push_str(&text);
                    out.push_str("</del>");
                }
            }
        }
        out
    }

    /// Plain-text rendering: `[deleted:...]` and `[inserted:...]`.
    pub fn to_bracketed(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment.marker {
                Marker::Unchanged => out.push_str(&segment.text),
                Marker::Inserted => {
                    out.push_str("[inserted:");
                    out.push_str(&segment.text);
                    out.push(']');
                }
                Marker::Deleted => {
                    out.push_str("[deleted:");
                    out.push_str(&segment.text);
                    out.push(']');
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::derive_changes;
    use crate::reconstruct::reconstruct;
    use amend_types::Change;

    fn unescape(text: &str) -> String {
        text.replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'")
            .replace("&amp;", "&")
    }

    fn inner<'a>(html: &'a str, tag: &str) -> Vec<&'a str> {
        let open = format!("<{tag}>");
        let close = format!("</{tag}>");
        html.split(open.as_str())
            .skip(1)
            .filter_map(|rest| rest.split(close.as_str()).next())
            .collect()
    }

    #[test]
    fn plain_text_is_borrowed() {
        assert!(matches!(escape_html("plain words"), Cow::Borrowed(_)));
    }

    #[test]
    fn markup_characters_are_escaped() {
        assert_eq!(
            escape_html(r#"<b>"A" & 'B'</b>"#),
            "&lt;b&gt;&quot;A&quot; &amp; &#39;B&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn inserted_markup_is_literal_text() {
        let original = "Clergy shall report annually.";
        let edited = "Clergy shall report <script>alert(1)</script> & annually.";
        let annotated = reconstruct(original, derive_changes(original, edited).as_slice());
        let html = annotated.to_html();

        assert!(!html.contains("<script>"));
        let inserted = inner(&html, "ins");
        assert_eq!(inserted.len(), 1);
        let literal = unescape(inserted[0]);
        assert!(literal.contains("<script>alert(1)</script>"));
        assert!(literal.contains('&'));
    }

    #[test]
    fn deleted_markup_is_escaped_too() {
        let annotated = reconstruct("a <b> c", &[Change::delete("<b>", 2)]);
        assert_eq!(annotated.to_html(), "a <del>&lt;b&gt;</del> c");
    }

    #[test]
    fn bracketed_rendering() {
        let annotated = reconstruct(
            "The cat sat",
            &[Change::insert("dog", 4), Change::delete("cat", 4)],
        );
        assert_eq!(annotated.to_bracketed(), "The [deleted:cat][inserted:dog] sat");
        assert_eq!(annotated.to_html(), "The <del>cat</del><ins>dog</ins> sat");
    }

    #[test]
    fn json_shape_uses_lowercase_markers() {
        let annotated = reconstruct("a b", &[Change::delete("b", 2), Change::insert("c", 2)]);
        let json = serde_json::to_value(&annotated).unwrap();
        assert_eq!(
            json["segments"],
            serde_json::json!([
                {"text": "a ", "marker": "unchanged"},
                {"text": "b", "marker": "deleted"},
                {"text": "c", "marker": "inserted"}
            ])
        );
        assert_eq!(json["warnings"], serde_json::json!([]));
    }
}
