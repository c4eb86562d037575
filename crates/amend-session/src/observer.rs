//! Observers notified after every session update.

use std::cell::RefCell;
use std::rc::Rc;

use amend_diff::{reconstruct, AnnotatedText};
use amend_types::{ChangeSet, ReferenceParagraph};

/// Snapshot of session state passed to observers.
#[derive(Clone, Copy, Debug)]
pub struct EditEvent<'a> {
    pub paragraph: &'a ReferenceParagraph,
    pub edited: &'a str,
    pub changes: &'a ChangeSet,
}

/// Receives the re-derived change set after select, edit and reset.
pub trait EditObserver {
    fn changes_updated(&mut self, event: &EditEvent<'_>);
}

impl<F> EditObserver for F
where
    F: FnMut(&EditEvent<'_>),
{
    fn changes_updated(&mut self, event: &EditEvent<'_>) {
        self(event)
    }
}

/// Keeps the latest annotated rendering of the session.
///
/// Clones share state: subscribe one clone and read from another.
#[derive(Clone, Debug, Default)]
pub struct LivePreview {
    latest: Rc<RefCell<Option<AnnotatedText>>>,
}

impl LivePreview {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent rendering, or `None` when there is nothing to show
    /// (no paragraph selected yet, or the text is unchanged).
    pub fn latest(&self) -> Option<AnnotatedText> {
        self.latest.borrow().clone()
    }
}

impl EditObserver for LivePreview {
    fn changes_updated(&mut self, event: &EditEvent<'_>) {
        let rendered = if event.changes.is_empty() {
            None
        } else {
            Some(reconstruct(
                &event.paragraph.current_text,
                event.changes.as_slice(),
            ))
        };
        *self.latest.borrow_mut() = rendered;
    }
}
