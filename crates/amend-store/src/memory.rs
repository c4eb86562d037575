//! In-memory store for tests, the CLI and short-lived processes.
//!
//! [`InMemoryStore`] keeps every table in a `HashMap` behind one `RwLock`, so
//! the uniqueness checks and the inserts they guard happen atomically.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use amend_types::{
    CitationLabel, Committee, CommitteeId, CommitteeVote, ParagraphId, Petition, PetitionId,
    ReferenceParagraph, VoteId,
};
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::traits::{ParagraphStore, PetitionStore};

#[derive(Default)]
struct Tables {
    paragraphs: HashMap<ParagraphId, ReferenceParagraph>,
    by_citation: HashMap<CitationLabel, ParagraphId>,
    petitions: HashMap<PetitionId, Petition>,
    committees: HashMap<CommitteeId, Committee>,
    votes: HashMap<VoteId, CommitteeVote>,
}

/// An in-memory implementation of [`ParagraphStore`] and [`PetitionStore`].
///
/// Data is lost when the store is dropped.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-loaded with `paragraphs`.
    pub fn with_paragraphs(
        paragraphs: impl IntoIterator<Item = ReferenceParagraph>,
    ) -> StoreResult<Self> {
        let store = Self::new();
        for paragraph in paragraphs {
            store.insert_paragraph(&paragraph)?;
        }
        Ok(store)
    }

    /// Number of stored paragraphs.
    pub fn paragraph_count(&self) -> StoreResult<usize> {
        Ok(self.read()?.paragraphs.len())
    }

    /// Number of stored petitions.
    pub fn petition_count(&self) -> StoreResult<usize> {
        Ok(self.read()?.petitions.len())
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }
}

impl ParagraphStore for InMemoryStore {
    fn insert_paragraph(&self, paragraph: &ReferenceParagraph) -> StoreResult<ParagraphId> {
        let mut tables = self.write()?;
        if tables.by_citation.contains_key(&paragraph.number) {
            warn!(label = %paragraph.number, "rejected duplicate citation label");
            return Err(StoreError::DuplicateCitation(paragraph.number.clone()));
        }
        if tables.paragraphs.contains_key(&paragraph.id) {
            return Err(StoreError::DuplicateId {
                kind: "paragraph",
                id: paragraph.id.to_string(),
            });
        }
        tables
            .by_citation
            .insert(paragraph.number.clone(), paragraph.id);
        tables.paragraphs.insert(paragraph.id, paragraph.clone());
        debug!(label = %paragraph.number, "paragraph stored");
        Ok(paragraph.id)
    }

    fn paragraph(&self, id: &ParagraphId) -> StoreResult<Option<ReferenceParagraph>> {
        Ok(self.read()?.paragraphs.get(id).cloned())
    }

    fn paragraph_by_citation(
        &self,
        label: &CitationLabel,
    ) -> StoreResult<Option<ReferenceParagraph>> {
        let tables = self.read()?;
        Ok(tables
            .by_citation
            .get(label)
            .and_then(|id| tables.paragraphs.get(id))
            .cloned())
    }

    fn list_paragraphs(&self) -> StoreResult<Vec<ReferenceParagraph>> {
        let mut paragraphs: Vec<ReferenceParagraph> =
            self.read()?.paragraphs.values().cloned().collect();
        paragraphs.sort_by(|a, b| a.number.cmp(&b.number));
        Ok(paragraphs)
    }
}

impl PetitionStore for InMemoryStore {
    fn insert_petition(&self, petition: &Petition) -> StoreResult<PetitionId> {
        let mut tables = self.write()?;
        if tables.petitions.contains_key(&petition.id) {
            return Err(StoreError::DuplicateId {
                kind: "petition",
                id: petition.id.to_string(),
            });
        }
        tables.petitions.insert(petition.id, petition.clone());
        Ok(petition.id)
    }

    fn petition(&self, id: &PetitionId) -> StoreResult<Option<Petition>> {
        Ok(self.read()?.petitions.get(id).cloned())
    }

    fn update_petition(&self, petition: &Petition) -> StoreResult<()> {
        let mut tables = self.write()?;
        match tables.petitions.get_mut(&petition.id) {
            Some(slot) => {
                *slot = petition.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound {
                kind: "petition",
                id: petition.id.to_string(),
            }),
        }
    }

    fn list_petitions(&self) -> StoreResult<Vec<Petition>> {
        let mut petitions: Vec<Petition> = self.read()?.petitions.values().cloned().collect();
        petitions.sort_by(|a, b| {
            b.submitted_at
                .cmp(&a.submitted_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(petitions)
    }

    fn insert_committee(&self, committee: &Committee) -> StoreResult<CommitteeId> {
        let mut tables = self.write()?;
        let name = committee.name.trim().to_lowercase();
        let abbreviation = committee.abbreviation.trim().to_lowercase();
        let clash = tables.committees.values().any(|c| {
            c.name.trim().to_lowercase() == name
                || c.abbreviation.trim().to_lowercase() == abbreviation
        });
        if clash {
            warn!(name = %committee.name, "rejected duplicate committee");
            return Err(StoreError::DuplicateCommittee(committee.name.clone()));
        }
        tables.committees.insert(committee.id, committee.clone());
        Ok(committee.id)
    }

    fn committee(&self, id: &CommitteeId) -> StoreResult<Option<Committee>> {
        Ok(self.read()?.committees.get(id).cloned())
    }

    fn committees(&self) -> StoreResult<Vec<Committee>> {
        let mut committees: Vec<Committee> = self.read()?.committees.values().cloned().collect();
        committees.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(committees)
    }

    fn insert_vote(&self, vote: &CommitteeVote) -> StoreResult<VoteId> {
        let mut tables = self.write()?;
        if tables.votes.contains_key(&vote.id) {
            return Err(StoreError::DuplicateId {
                kind: "vote",
                id: vote.id.to_string(),
            });
        }
        tables.votes.insert(vote.id, vote.clone());
        Ok(vote.id)
    }

    fn vote(&self, id: &VoteId) -> StoreResult<Option<CommitteeVote>> {
        Ok(self.read()?.votes.get(id).cloned())
    }

    fn update_vote(&self, vote: &CommitteeVote) -> StoreResult<()> {
        let mut tables = self.write()?;
        match tables.votes.get_mut(&vote.id) {
            Some(slot) => {
                *slot = vote.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound {
                kind: "vote",
                id: vote.id.to_string(),
            }),
        }
    }

    fn votes_for(&self, petition: &PetitionId) -> StoreResult<Vec<CommitteeVote>> {
        let mut votes: Vec<CommitteeVote> = self
            .read()?
            .votes
            .values()
            .filter(|v| v.petition == *petition)
            .cloned()
            .collect();
        votes.sort_by(|a, b| a.recorded_at.cmp(&b.recorded_at).then_with(|| a.id.cmp(&b.id)));
        Ok(votes)
    }
}

impl std::fmt::Debug for InMemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("InMemoryStore");
        if let Ok(tables) = self.tables.read() {
            s.field("paragraphs", &tables.paragraphs.len())
                .field("petitions", &tables.petitions.len())
                .field("committees", &tables.committees.len())
                .field("votes", &tables.votes.len());
        }
        s.finish()
    }
}
