use amend_diff::{reconstruct, verify_amendment, AnnotatedText, DiffError};
use amend_session::{AmendmentSink, BoxError, EditSession, SessionError};
use amend_store::{ParagraphStore, PetitionStore, StoreError};
use amend_types::{
    Amendment, Approval, CitationLabel, Committee, CommitteeId, CommitteeVote, ParagraphId,
    Petition, PetitionId, PetitionStatus, ReferenceParagraph, VoteAction, VoteId, VoteTally,
};
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::draft::PetitionDraft;
use crate::error::{WorkflowError, WorkflowResult};

/// High-level petition workflow over a storage backend.
///
/// Covers the path of one amendment: a submitter edits a paragraph, the
/// secretary routes the petition to a committee, the recorder enters votes
/// and approves them, and reviewers read the reconstructed change.
pub struct Workflow<S> {
    store: S,
}

impl<S> Workflow<S>
where
    S: ParagraphStore + PetitionStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    // ---- Paragraphs ----

    /// Add a reference paragraph. Labels must be unique.
    pub fn seed_paragraph(&self, paragraph: ReferenceParagraph) -> WorkflowResult<ParagraphId> {
        let id = self.store.insert_paragraph(&paragraph)?;
        debug!(label = %paragraph.number, "paragraph seeded");
        Ok(id)
    }

    /// Look a paragraph up by citation label in any accepted spelling
    /// (`¶324`, `Para. 324`, `324`).
    pub fn find_paragraph(&self, label: &str) -> WorkflowResult<ReferenceParagraph> {
        let label = CitationLabel::parse(label)?;
        self.store
            .paragraph_by_citation(&label)?
            .ok_or_else(|| WorkflowError::ParagraphNotFound(label.to_string()))
    }

    pub fn search(&self, query: &str) -> WorkflowResult<Vec<ReferenceParagraph>> {
        Ok(self.store.search_paragraphs(query)?)
    }

    pub fn paragraphs(&self) -> WorkflowResult<Vec<ReferenceParagraph>> {
        Ok(self.store.list_paragraphs()?)
    }

    /// Start editing the paragraph cited by `label`.
    pub fn open_session(&self, label: &str) -> WorkflowResult<EditSession> {
        Ok(EditSession::for_paragraph(self.find_paragraph(label)?))
    }

    // ---- Submission ----

    /// Submit the session's amendment as a new petition.
    ///
    /// The amendment is checked before it is stored: the change records
    /// must replay onto the paragraph's current text to give the edited
    /// text. The session is closed on success and left open on failure.
    pub fn submit_petition(
        &self,
        draft: PetitionDraft,
        session: &mut EditSession,
    ) -> WorkflowResult<Petition> {
        draft.validate()?;
        let mut sink = PetitionSink {
            store: &self.store,
            draft: &draft,
        };
        let petition = session.submit(&mut sink).map_err(unwrap_persistence)?;
        info!(
            petition = %petition.id,
            paragraph = %petition.paragraph,
            submitter = %petition.submitter.name,
            "petition submitted"
        );
        Ok(petition)
    }

    pub fn petition(&self, id: &PetitionId) -> WorkflowResult<Petition> {
        self.store
            .petition(id)?
            .ok_or(WorkflowError::PetitionNotFound(*id))
    }

    /// All petitions, newest first.
    pub fn petitions(&self) -> WorkflowResult<Vec<Petition>> {
        Ok(self.store.list_petitions()?)
    }

    // ---- Secretary ----

    pub fn register_committee(
        &self,
        name: impl Into<String>,
        abbreviation: impl Into<String>,
    ) -> WorkflowResult<Committee> {
        let committee = Committee::new(name, abbreviation);
        self.store.insert_committee(&committee)?;
        debug!(committee = %committee.abbreviation, "committee registered");
        Ok(committee)
    }

    pub fn committees(&self) -> WorkflowResult<Vec<Committee>> {
        Ok(self.store.committees()?)
    }

    /// Route a petition to a committee. A petition that is already
    /// assigned may be reassigned until a committee has acted on it.
    pub fn assign(&self, petition: &PetitionId, committee: &CommitteeId) -> WorkflowResult<Petition> {
        let committee = self
            .store
            .committee(committee)?
            .ok_or_else(|| WorkflowError::CommitteeNotFound(committee.to_string()))?;
        let mut petition = self.petition(petition)?;
        petition.assign_to(committee.id)?;
        self.store.update_petition(&petition)?;
        info!(
            petition = %petition.id,
            committee = %committee.abbreviation,
            "petition assigned"
        );
        Ok(petition)
    }

    // ---- Recorder ----

    /// Record the assigned committee's vote and move the petition to the
    /// status the action implies.
    pub fn record_vote(
        &self,
        petition: &PetitionId,
        action: VoteAction,
        tally: VoteTally,
        recorded_by: impl Into<String>,
    ) -> WorkflowResult<CommitteeVote> {
        let mut petition = self.petition(petition)?;
        let Some(committee) = petition.committee else {
            warn!(petition = %petition.id, "vote recorded for unassigned petition");
            return Err(WorkflowError::NotAssigned {
                petition: petition.id,
                status: petition.status,
            });
        };
        petition.advance(action.resulting_status())?;

        let vote = CommitteeVote::new(petition.id, committee, action, tally, recorded_by);
        self.store.insert_vote(&vote)?;
        self.store.update_petition(&petition)?;
        info!(
            petition = %petition.id,
            action = %action,
            yes = tally.yes,
            no = tally.no,
            abstain = tally.abstain,
            status = %petition.status,
            "committee vote recorded"
        );
        Ok(vote)
    }

    /// Sign off on a recorded vote. Approving an `adopt` vote approves the
    /// petition.
    pub fn approve_vote(
        &self,
        vote: &VoteId,
        approver: impl Into<String>,
    ) -> WorkflowResult<CommitteeVote> {
        let mut vote = self
            .store
            .vote(vote)?
            .ok_or(WorkflowError::VoteNotFound(*vote))?;
        if vote.is_approved() {
            return Err(WorkflowError::AlreadyApproved(vote.id));
        }

        if vote.action == VoteAction::Adopt {
            let mut petition = self.petition(&vote.petition)?;
            petition.advance(PetitionStatus::Approved)?;
            self.store.update_petition(&petition)?;
            info!(petition = %petition.id, "petition approved");
        }

        vote.approval = Some(Approval {
            approved_by: approver.into(),
            approved_at: Utc::now(),
        });
        self.store.update_vote(&vote)?;
        debug!(vote = %vote.id, action = %vote.action, "vote approved");
        Ok(vote)
    }

    pub fn votes_for(&self, petition: &PetitionId) -> WorkflowResult<Vec<CommitteeVote>> {
        Ok(self.store.votes_for(petition)?)
    }

    // ---- Review ----

    /// Rebuild the annotated view of a petition's amendment from what was
    /// stored with it. The reference paragraph's present text is not
    /// consulted, so later edits to the paragraph do not change the view.
    pub fn review(&self, petition: &PetitionId) -> WorkflowResult<AnnotatedText> {
        let petition = self.petition(petition)?;
        let amendment = &petition.amendment;
        let annotated = reconstruct(&amendment.original_text, amendment.changes.as_slice());
        if !annotated.is_clean() {
            warn!(
                petition = %petition.id,
                skipped = annotated.warnings.len(),
                "stored amendment has malformed change records"
            );
        }
        Ok(annotated)
    }
}

impl<S> std::fmt::Debug for Workflow<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workflow").finish_non_exhaustive()
    }
}

/// Turns a session's amendment into a stored petition.
struct PetitionSink<'a, S> {
    store: &'a S,
    draft: &'a PetitionDraft,
}

impl<S> AmendmentSink for PetitionSink<'_, S>
where
    S: ParagraphStore + PetitionStore,
{
    type Receipt = Petition;

    fn persist(
        &mut self,
        paragraph: &ReferenceParagraph,
        amendment: Amendment,
    ) -> Result<Petition, BoxError> {
        let current = self
            .store
            .paragraph_by_citation(&paragraph.number)?
            .ok_or_else(|| WorkflowError::ParagraphNotFound(paragraph.number.to_string()))?;
        if current.current_text != amendment.original_text {
            return Err(WorkflowError::StaleParagraph {
                label: paragraph.number.to_string(),
            }
            .into());
        }
        verify_amendment(&amendment)?;

        let petition = self.draft.clone().into_petition(paragraph.number.clone(), amendment);
        self.store.insert_petition(&petition)?;
        Ok(petition)
    }
}

/// Recover the typed error a sink failed with.
fn unwrap_persistence(err: SessionError) -> WorkflowError {
    let SessionError::Persistence(source) = err else {
        return WorkflowError::Session(err);
    };
    let source = match source.downcast::<WorkflowError>() {
        Ok(workflow) => return *workflow,
        Err(source) => source,
    };
    let source = match source.downcast::<StoreError>() {
        Ok(store) => return WorkflowError::Store(*store),
        Err(source) => source,
    };
    match source.downcast::<DiffError>() {
        Ok(diff) => WorkflowError::Diff(*diff),
        Err(source) => WorkflowError::Session(SessionError::Persistence(source)),
    }
}
