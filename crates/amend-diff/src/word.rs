//! Word-level diff: token comparison of two strings.
//!
//! Text is split into words, whitespace runs and single punctuation
//! characters, then compared with the `similar` crate (Myers algorithm).
//! The non-equal tokens between two equal runs are coalesced into one
//! removed [`Span`] followed by one added [`Span`].

use serde::{Deserialize, Serialize};
use similar::{capture_diff_slices, Algorithm, DiffTag};

/// Classification of a diff span.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanKind {
    /// Present in both texts.
    Equal,
    /// Present only in the edited text.
    Added,
    /// Present only in the original text.
    Removed,
}

/// A run of tokens sharing one [`SpanKind`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub kind: SpanKind,
    pub value: String,
}

impl Span {
    pub fn new(kind: SpanKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum TokenClass {
    Word,
    Space,
    Punct,
}

fn classify(c: char) -> TokenClass {
    if c.is_alphanumeric() || c == '_' {
        TokenClass::Word
    } else if c.is_whitespace() {
        TokenClass::Space
    } else {
        TokenClass::Punct
    }
}

/// Split `text` into diff tokens.
///
/// Words are runs of alphanumerics (an apostrophe between two word
/// characters stays inside the word, so `pastor's` is one token),
/// whitespace runs are one token, and every other character is a token of
/// its own. Concatenating the tokens always yields `text`.
pub fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();
    let mut start = 0;
    let mut current: Option<TokenClass> = None;

    while let Some((idx, c)) = chars.next() {
        let mut class = classify(c);
        if class == TokenClass::Punct
            && matches!(c, '\'' | '\u{2019}')
            && current == Some(TokenClass::Word)
            && chars
                .peek()
                .is_some_and(|&(_, next)| classify(next) == TokenClass::Word)
        {
            class = TokenClass::Word;
        }

        match current {
            Some(prev) if prev == class && class != TokenClass::Punct => {}
            Some(_) => {
                tokens.push(&text[start..idx]);
                start = idx;
            }
            None => start = idx,
        }
        current = Some(class);
    }

    if current.is_some() {
        tokens.push(&text[start..]);
    }
    tokens
}

/// Compute the word-level diff between `original` and `edited`.
///
/// Concatenating `Equal` + `Removed` values yields `original`; concatenating
/// `Equal` + `Added` values yields `edited`. Between two `Equal` spans there
/// is at most one `Removed` span followed by at most one `Added` span. The
/// output is deterministic for a given input pair.
pub fn diff_words(original: &str, edited: &str) -> Vec<Span> {
    let old_tokens = tokenize(original);
    let new_tokens = tokenize(edited);
    let ops = capture_diff_slices(Algorithm::Myers, &old_tokens, &new_tokens);

    let mut spans = Vec::new();
    let mut hunk = Hunk::default();
    for op in &ops {
        let (tag, old_range, new_range) = op.as_tag_tuple();
        match tag {
            DiffTag::Equal => {
                hunk.flush(&mut spans);
                spans.push(Span::new(SpanKind::Equal, old_tokens[old_range].concat()));
            }
            DiffTag::Delete => hunk.removed.extend(old_tokens[old_range].iter().copied()),
            DiffTag::Insert => hunk.added.extend(new_tokens[new_range].iter().copied()),
            DiffTag::Replace => {
                hunk.removed.extend(old_tokens[old_range].iter().copied());
                hunk.added.extend(new_tokens[new_range].iter().copied());
            }
        }
    }
    hunk.flush(&mut spans);
    spans
}

/// Pending non-equal tokens between two equal runs.
#[derive(Default)]
struct Hunk {
    removed: String,
    added: String,
}

impl Hunk {
    fn flush(&mut self, spans: &mut Vec<Span>) {
        if !self.removed.is_empty() {
            spans.push(Span::new(SpanKind::Removed, std::mem::take(&mut self.removed)));
        }
        if !self.added.is_empty() {
            spans.push(Span::new(SpanKind::Added, std::mem::take(&mut self.added)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn join(spans: &[Span], keep: SpanKind) -> String {
        spans
            .iter()
            .filter(|s| s.kind == SpanKind::Equal || s.kind == keep)
            .map(|s| s.value.as_str())
            .collect()
    }

    #[test]
    fn tokenizer_splits_words_spaces_and_punctuation() {
        assert_eq!(
            tokenize("years. No pastor's  charge,"),
            vec!["years", ".", " ", "No", " ", "pastor's", "  ", "charge", ","]
        );
    }

    #[test]
    fn tokenizer_keeps_consecutive_punctuation_separate() {
        assert_eq!(tokenize("...!"), vec![".", ".", ".", "!"]);
    }

    #[test]
    fn tokenizer_handles_unicode() {
        assert_eq!(tokenize("¶324 café"), vec!["¶", "324", " ", "café"]);
    }

    #[test]
    fn tokenizer_trailing_apostrophe_is_punctuation() {
        assert_eq!(tokenize("pastors'"), vec!["pastors", "'"]);
    }

    #[test]
    fn identical_texts_are_one_equal_span() {
        let spans = diff_words("the same text", "the same text");
        assert_eq!(spans, vec![Span::new(SpanKind::Equal, "the same text")]);
    }

    #[test]
    fn both_empty_yields_nothing() {
        assert!(diff_words("", "").is_empty());
    }

    #[test]
    fn empty_to_content_is_one_added_span() {
        let spans = diff_words("", "new text");
        assert_eq!(spans, vec![Span::new(SpanKind::Added, "new text")]);
    }

    #[test]
    fn content_to_empty_is_one_removed_span() {
        let spans = diff_words("old text", "");
        assert_eq!(spans, vec![Span::new(SpanKind::Removed, "old text")]);
    }

    #[test]
    fn single_word_replacement() {
        let spans = diff_words("more than six years", "more than ten years");
        assert_eq!(
            spans,
            vec![
                Span::new(SpanKind::Equal, "more than "),
                Span::new(SpanKind::Removed, "six"),
                Span::new(SpanKind::Added, "ten"),
                Span::new(SpanKind::Equal, " years"),
            ]
        );
    }

    #[test]
    fn insertion_before_punctuation() {
        let spans = diff_words(
            "environmental stewardship.",
            "environmental stewardship, mental health awareness.",
        );
        assert_eq!(
            spans,
            vec![
                Span::new(SpanKind::Equal, "environmental stewardship"),
                Span::new(SpanKind::Added, ", mental health awareness"),
                Span::new(SpanKind::Equal, "."),
            ]
        );
    }

    #[test]
    fn spans_reconstruct_both_sides() {
        let original = "All clergy shall attend annual conference sessions.";
        let edited = "All ordained clergy must attend conference sessions!";
        let spans = diff_words(original, edited);
        assert_eq!(join(&spans, SpanKind::Removed), original);
        assert_eq!(join(&spans, SpanKind::Added), edited);
    }

    #[test]
    fn diff_is_deterministic() {
        let a = "The cat sat on the mat.";
        let b = "A dog sat by the mat, quietly.";
        assert_eq!(diff_words(a, b), diff_words(a, b));
    }

    #[test]
    fn adjacent_spans_never_share_a_kind() {
        let spans = diff_words("a b c d e", "x y z");
        for pair in spans.windows(2) {
            assert_ne!(pair[0].kind, pair[1].kind);
        }
    }
}
