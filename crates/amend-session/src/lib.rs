//! Interactive edit sessions over one reference paragraph.
//!
//! An [`EditSession`] owns the `(original, edited, changes)` state of one
//! in-flight amendment. Every edit re-derives the change set synchronously
//! and notifies subscribed [`EditObserver`]s (typically a [`LivePreview`]);
//! [`EditSession::submit`] hands the finished [`Amendment`](amend_types::Amendment)
//! to an [`AmendmentSink`].
//!
//! ```text
//! Unselected --select--> Editing --on_edit/reset/select--> Editing --submit--> Submitted
//! ```

pub mod error;
pub mod observer;
pub mod session;

pub use error::{BoxError, SessionError, SessionResult};
pub use observer::{EditEvent, EditObserver, LivePreview};
pub use session::{AmendmentSink, EditSession, SessionState};
