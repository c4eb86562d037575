//! The storage traits consumed by the workflow layer.

use amend_types::{
    CitationLabel, Committee, CommitteeId, CommitteeVote, ParagraphId, Petition, PetitionId,
    ReferenceParagraph, VoteId,
};

use crate::error::StoreResult;

/// Storage backend for reference paragraphs.
///
/// Implementations must reject a second paragraph carrying an existing
/// citation label: the rest of the system resolves petitions to paragraphs
/// by label alone.
pub trait ParagraphStore: Send + Sync {
    /// Insert a paragraph and return its ID.
    fn insert_paragraph(&self, paragraph: &ReferenceParagraph) -> StoreResult<ParagraphId>;

    /// Read a paragraph by ID. Returns `Ok(None)` if absent.
    fn paragraph(&self, id: &ParagraphId) -> StoreResult<Option<ReferenceParagraph>>;

    /// Read a paragraph by citation label. Returns `Ok(None)` if absent.
    fn paragraph_by_citation(
        &self,
        label: &CitationLabel,
    ) -> StoreResult<Option<ReferenceParagraph>>;

    /// All paragraphs, ordered by citation label.
    fn list_paragraphs(&self) -> StoreResult<Vec<ReferenceParagraph>>;

    /// Paragraphs whose label, title or text contains `query`
    /// (case-insensitive).
    ///
    /// Default implementation filters `list_paragraphs()`. Backends with an
    /// index may override.
    fn search_paragraphs(&self, query: &str) -> StoreResult<Vec<ReferenceParagraph>> {
        Ok(self
            .list_paragraphs()?
            .into_iter()
            .filter(|p| p.matches(query))
            .collect())
    }
}

/// Storage backend for petitions, committees and committee votes.
pub trait PetitionStore: Send + Sync {
    /// Insert a newly submitted petition.
    fn insert_petition(&self, petition: &Petition) -> StoreResult<PetitionId>;

    /// Read a petition by ID. Returns `Ok(None)` if absent.
    fn petition(&self, id: &PetitionId) -> StoreResult<Option<Petition>>;

    /// Replace a stored petition. Fails with `NotFound` if absent.
    fn update_petition(&self, petition: &Petition) -> StoreResult<()>;

    /// All petitions, newest submission first.
    fn list_petitions(&self) -> StoreResult<Vec<Petition>>;

    /// Insert a committee. Names and abbreviations must be unique.
    fn insert_committee(&self, committee: &Committee) -> StoreResult<CommitteeId>;

    /// Read a committee by ID. Returns `Ok(None)` if absent.
    fn committee(&self, id: &CommitteeId) -> StoreResult<Option<Committee>>;

    /// All committees, ordered by name.
    fn committees(&self) -> StoreResult<Vec<Committee>>;

    /// Record a committee vote.
    fn insert_vote(&self, vote: &CommitteeVote) -> StoreResult<VoteId>;

    /// Read a vote by ID. Returns `Ok(None)` if absent.
    fn vote(&self, id: &VoteId) -> StoreResult<Option<CommitteeVote>>;

    /// Replace a stored vote. Fails with `NotFound` if absent.
    fn update_vote(&self, vote: &CommitteeVote) -> StoreResult<()>;

    /// Votes recorded for a petition, oldest first.
    fn votes_for(&self, petition: &PetitionId) -> StoreResult<Vec<CommitteeVote>>;
}
