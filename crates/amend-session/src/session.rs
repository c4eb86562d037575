use std::fmt;

use amend_diff::derive_changes;
use amend_types::{Amendment, ChangeSet, ReferenceParagraph};
use tracing::{debug, info, warn};

use crate::error::{BoxError, SessionError, SessionResult};
use crate::observer::{EditEvent, EditObserver};

/// Where an edit session is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// No paragraph chosen yet.
    Unselected,
    /// A paragraph is loaded and may be edited.
    Editing,
    /// The amendment was handed to persistence. Terminal.
    Submitted,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unselected => write!(f, "no paragraph is selected"),
            Self::Editing => write!(f, "editing"),
            Self::Submitted => write!(f, "already submitted"),
        }
    }
}

/// Receives the finished amendment on submit.
pub trait AmendmentSink {
    /// What persistence hands back (e.g. a petition ID).
    type Receipt;

    fn persist(
        &mut self,
        paragraph: &ReferenceParagraph,
        amendment: Amendment,
    ) -> Result<Self::Receipt, BoxError>;
}

/// Controller for one in-progress amendment.
///
/// Owns the session's `(original, edited, changes)` state exclusively;
/// every operation runs to completion on the caller's thread.
pub struct EditSession {
    state: SessionState,
    paragraph: Option<ReferenceParagraph>,
    edited: String,
    changes: ChangeSet,
    observers: Vec<Box<dyn EditObserver>>,
}

impl EditSession {
    /// Create a session with no paragraph selected.
    pub fn new() -> Self {
        Self {
            state: SessionState::Unselected,
            paragraph: None,
            edited: String::new(),
            changes: ChangeSet::new(),
            observers: Vec::new(),
        }
    }

    /// Create a session already editing `paragraph`.
    pub fn for_paragraph(paragraph: ReferenceParagraph) -> Self {
        let mut session = Self::new();
        session.load(paragraph);
        session
    }

    /// Register an observer. It is notified on the next update.
    pub fn subscribe(&mut self, observer: impl EditObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Load `paragraph` as the session's original text, discarding any
    /// edits to a previously selected paragraph.
    pub fn select(&mut self, paragraph: ReferenceParagraph) -> SessionResult<()> {
        if self.state == SessionState::Submitted {
            return Err(self.invalid("select a paragraph"));
        }
        self.load(paragraph);
        self.notify();
        Ok(())
    }

    /// Replace the edited text and re-derive the change set.
    pub fn on_edit(&mut self, edited: impl Into<String>) -> SessionResult<&ChangeSet> {
        self.require_editing("edit")?;
        self.edited = edited.into();
        self.changes = derive_changes(self.original(), &self.edited);
        debug!(
            changes = self.changes.len(),
            edited_len = self.edited.len(),
            "edit applied"
        );
        self.notify();
        Ok(&self.changes)
    }

    /// Restore the edited text to the original and clear the change set.
    pub fn reset(&mut self) -> SessionResult<()> {
        self.require_editing("reset")?;
        self.edited = self.original().to_string();
        self.changes = ChangeSet::new();
        debug!("session reset");
        self.notify();
        Ok(())
    }

    /// Hand the amendment to `sink` and close the session.
    ///
    /// Fails with [`SessionError::NoChanges`] when the text was not
    /// amended. On a sink failure the session stays in `Editing` so the
    /// submission can be retried.
    pub fn submit<K: AmendmentSink>(&mut self, sink: &mut K) -> SessionResult<K::Receipt> {
        self.require_editing("submit")?;
        if self.changes.is_empty() {
            warn!("rejected submission without changes");
            return Err(SessionError::NoChanges);
        }
        let (Some(paragraph), Some(amendment)) = (&self.paragraph, self.amendment()) else {
            return Err(self.invalid("submit"));
        };

        let receipt = sink
            .persist(paragraph, amendment)
            .map_err(SessionError::Persistence)?;
        info!(
            paragraph = %paragraph.number,
            changes = self.changes.len(),
            "amendment submitted"
        );
        self.state = SessionState::Submitted;
        Ok(receipt)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn paragraph(&self) -> Option<&ReferenceParagraph> {
        self.paragraph.as_ref()
    }

    /// The paragraph's text as loaded; empty before selection.
    pub fn original(&self) -> &str {
        self.paragraph
            .as_ref()
            .map_or("", |p| p.current_text.as_str())
    }

    pub fn edited_text(&self) -> &str {
        &self.edited
    }

    pub fn changes(&self) -> &ChangeSet {
        &self.changes
    }

    /// The current `(original, edited, changes)` triple, if a paragraph is
    /// selected.
    pub fn amendment(&self) -> Option<Amendment> {
        self.paragraph.as_ref().map(|p| {
            Amendment::new(
                p.current_text.clone(),
                self.edited.clone(),
                self.changes.clone(),
            )
        })
    }

    fn load(&mut self, paragraph: ReferenceParagraph) {
        debug!(paragraph = %paragraph.number, "paragraph selected");
        self.edited = paragraph.current_text.clone();
        self.changes = ChangeSet::new();
        self.paragraph = Some(paragraph);
        self.state = SessionState::Editing;
    }

    fn notify(&mut self) {
        let Some(paragraph) = &self.paragraph else {
            return;
        };
        let event = EditEvent {
            paragraph,
            edited: &self.edited,
            changes: &self.changes,
        };
        for observer in &mut self.observers {
            observer.changes_updated(&event);
        }
    }

    fn require_editing(&self, operation: &'static str) -> SessionResult<()> {
        if self.state == SessionState::Editing {
            Ok(())
        } else {
            Err(self.invalid(operation))
        }
    }

    fn invalid(&self, operation: &'static str) -> SessionError {
        SessionError::InvalidState {
            operation,
            state: self.state,
        }
    }
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EditSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditSession")
            .field("state", &self.state)
            .field("paragraph", &self.paragraph.as_ref().map(|p| &p.number))
            .field("changes", &self.changes.len())
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::LivePreview;
    use amend_types::{Change, CitationLabel};
    use std::cell::RefCell;
    use std::rc::Rc;

    const TERM_LIMITS: &str =
        "No pastor shall be appointed to the same charge for more than six consecutive years.";

    fn term_limits() -> ReferenceParagraph {
        ReferenceParagraph::new(
            CitationLabel::parse("¶324").unwrap(),
            "Term Limits",
            "Part VI",
            TERM_LIMITS,
        )
    }

    fn stewardship() -> ReferenceParagraph {
        ReferenceParagraph::new(
            CitationLabel::parse("¶160").unwrap(),
            "The Natural World",
            "Social Principles",
            "Churches are encouraged to practice environmental stewardship.",
        )
    }

    #[derive(Default)]
    struct RecordingSink {
        received: Vec<(CitationLabel, Amendment)>,
        fail: bool,
    }

    impl AmendmentSink for RecordingSink {
        type Receipt = usize;

        fn persist(
            &mut self,
            paragraph: &ReferenceParagraph,
            amendment: Amendment,
        ) -> Result<usize, BoxError> {
            if self.fail {
                return Err("database unavailable".into());
            }
            self.received.push((paragraph.number.clone(), amendment));
            Ok(self.received.len())
        }
    }

    #[test]
    fn starts_unselected() {
        let mut session = EditSession::new();
        assert_eq!(session.state(), SessionState::Unselected);
        assert!(matches!(
            session.on_edit("text"),
            Err(SessionError::InvalidState {
                state: SessionState::Unselected,
                ..
            })
        ));
        assert!(session.reset().is_err());
        assert!(session.amendment().is_none());
    }

    #[test]
    fn edit_derives_changes() {
        let mut session = EditSession::for_paragraph(term_limits());
        let edited = TERM_LIMITS.replace("six", "ten");
        let changes = session.on_edit(edited.clone()).unwrap();
        assert_eq!(changes.len(), 2);
        assert_eq!(session.edited_text(), edited);
        assert_eq!(session.state(), SessionState::Editing);
    }

    #[test]
    fn last_edit_wins() {
        let mut session = EditSession::for_paragraph(term_limits());
        session.on_edit(TERM_LIMITS.replace("six", "ten")).unwrap();
        session.on_edit(TERM_LIMITS.replace("six", "eight")).unwrap();
        assert!(session
            .changes()
            .iter()
            .any(|c| c == &Change::insert("eight", TERM_LIMITS.find("six").unwrap())));
        assert!(!session.changes().iter().any(|c| c.text() == "ten"));
    }

    #[test]
    fn reset_restores_original() {
        let mut session = EditSession::for_paragraph(term_limits());
        session.on_edit("something else entirely").unwrap();
        session.reset().unwrap();
        assert_eq!(session.edited_text(), TERM_LIMITS);
        assert!(session.changes().is_empty());
    }

    #[test]
    fn selecting_another_paragraph_discards_changes() {
        let mut session = EditSession::for_paragraph(term_limits());
        session.on_edit(TERM_LIMITS.replace("six", "ten")).unwrap();
        session.select(stewardship()).unwrap();
        assert_eq!(session.state(), SessionState::Editing);
        assert!(session.changes().is_empty());
        assert_eq!(session.edited_text(), stewardship().current_text);
        assert_eq!(session.paragraph().unwrap().number.as_str(), "¶160");
    }

    #[test]
    fn submit_without_changes_is_rejected() {
        let mut session = EditSession::for_paragraph(term_limits());
        let mut sink = RecordingSink::default();
        assert!(matches!(session.submit(&mut sink), Err(SessionError::NoChanges)));

        // An edit that restores the original text is not an amendment either.
        session.on_edit("changed").unwrap();
        session.on_edit(TERM_LIMITS).unwrap();
        assert!(matches!(session.submit(&mut sink), Err(SessionError::NoChanges)));
        assert!(sink.received.is_empty());
        assert_eq!(session.state(), SessionState::Editing);
    }

    #[test]
    fn submit_hands_amendment_to_sink() {
        let mut session = EditSession::for_paragraph(stewardship());
        let edited =
            "Churches are encouraged to practice environmental stewardship, mental health awareness.";
        session.on_edit(edited).unwrap();

        let mut sink = RecordingSink::default();
        let receipt = session.submit(&mut sink).unwrap();
        assert_eq!(receipt, 1);
        assert_eq!(session.state(), SessionState::Submitted);

        let (label, amendment) = &sink.received[0];
        assert_eq!(label.as_str(), "¶160");
        assert_eq!(amendment.modified_text, edited);
        assert_eq!(amendment.changes.insertions(), 1);
        assert_eq!(amendment.changes.deletions(), 0);
    }

    #[test]
    fn submitted_session_is_closed() {
        let mut session = EditSession::for_paragraph(term_limits());
        session.on_edit(TERM_LIMITS.replace("six", "ten")).unwrap();
        session.submit(&mut RecordingSink::default()).unwrap();

        assert!(session.on_edit("more").is_err());
        assert!(session.reset().is_err());
        assert!(session.select(stewardship()).is_err());
        assert!(matches!(
            session.submit(&mut RecordingSink::default()),
            Err(SessionError::InvalidState {
                state: SessionState::Submitted,
                ..
            })
        ));
    }

    #[test]
    fn sink_failure_keeps_session_open() {
        let mut session = EditSession::for_paragraph(term_limits());
        session.on_edit(TERM_LIMITS.replace("six", "ten")).unwrap();
        let mut failing = RecordingSink {
            fail: true,
            ..Default::default()
        };
        assert!(matches!(
            session.submit(&mut failing),
            Err(SessionError::Persistence(_))
        ));
        assert_eq!(session.state(), SessionState::Editing);

        let mut working = RecordingSink::default();
        assert!(session.submit(&mut working).is_ok());
    }

    #[test]
    fn observers_see_every_update() {
        let seen: Rc<RefCell<Vec<usize>>> = Rc::default();
        let log = Rc::clone(&seen);

        let mut session = EditSession::new();
        session.subscribe(move |event: &EditEvent<'_>| {
            log.borrow_mut().push(event.changes.len());
        });
        session.select(term_limits()).unwrap();
        session.on_edit(TERM_LIMITS.replace("six", "ten")).unwrap();
        session.reset().unwrap();

        assert_eq!(*seen.borrow(), vec![0, 2, 0]);
    }

    #[test]
    fn live_preview_tracks_edits() {
        let preview = LivePreview::new();
        let mut session = EditSession::for_paragraph(term_limits());
        session.subscribe(preview.clone());
        assert!(preview.latest().is_none());

        session.on_edit(TERM_LIMITS.replace("six", "ten")).unwrap();
        let rendered = preview.latest().unwrap();
        assert!(rendered
            .to_bracketed()
            .contains("more than [deleted:six][inserted:ten] consecutive"));

        session.reset().unwrap();
        assert!(preview.latest().is_none());
    }
}
