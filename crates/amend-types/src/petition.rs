//! Petitions, committees and recorded committee votes.
//!
//! A petition moves through a small lifecycle:
//!
//! ```text
//! Submitted -> Assigned -> { InCommittee | Voted | Rejected }
//!                          InCommittee -> { InCommittee | Voted | Rejected }
//!                          Voted -> Approved
//! ```
//!
//! `Approved` and `Rejected` are terminal.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::amendment::Amendment;
use crate::citation::CitationLabel;
use crate::error::TypeError;
use crate::id::{CommitteeId, PetitionId, VoteId};

/// Lifecycle state of a petition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PetitionStatus {
    Submitted,
    Assigned,
    InCommittee,
    Voted,
    Rejected,
    Approved,
}

impl PetitionStatus {
    /// Whether `self -> next` is a legal transition.
    pub fn can_transition_to(self, next: PetitionStatus) -> bool {
        use PetitionStatus::*;
        matches!(
            (self, next),
            (Submitted | Assigned, Assigned)
                | (Assigned | InCommittee, InCommittee | Voted | Rejected)
                | (Voted, Approved)
        )
    }

    /// Perform a transition, rejecting illegal ones.
    pub fn transition(self, next: PetitionStatus) -> Result<PetitionStatus, TypeError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(TypeError::InvalidTransition { from: self, to: next })
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

impl fmt::Display for PetitionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Submitted => "submitted",
            Self::Assigned => "assigned",
            Self::InCommittee => "in_committee",
            Self::Voted => "voted",
            Self::Rejected => "rejected",
            Self::Approved => "approved",
        };
        f.write_str(s)
    }
}

/// Who submitted a petition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submitter {
    pub name: String,
    pub email: String,
    pub organization: Option<String>,
}

/// A submitted legislative petition amending one reference paragraph.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Petition {
    pub id: PetitionId,
    pub title: String,
    pub submitter: Submitter,
    pub paragraph: CitationLabel,
    pub rationale: Option<String>,
    pub amendment: Amendment,
    pub status: PetitionStatus,
    pub committee: Option<CommitteeId>,
    pub submitted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Petition {
    /// Create a freshly submitted petition.
    pub fn new(
        title: impl Into<String>,
        submitter: Submitter,
        paragraph: CitationLabel,
        rationale: Option<String>,
        amendment: Amendment,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: PetitionId::new(),
            title: title.into(),
            submitter,
            paragraph,
            rationale,
            amendment,
            status: PetitionStatus::Submitted,
            committee: None,
            submitted_at: now,
            updated_at: now,
        }
    }

    /// Move to `next`, stamping `updated_at`.
    pub fn advance(&mut self, next: PetitionStatus) -> Result<(), TypeError> {
        self.status = self.status.transition(next)?;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Route the petition to a committee.
    pub fn assign_to(&mut self, committee: CommitteeId) -> Result<(), TypeError> {
        self.advance(PetitionStatus::Assigned)?;
        self.committee = Some(committee);
        Ok(())
    }
}

/// A legislative committee.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Committee {
    pub id: CommitteeId,
    pub name: String,
    pub abbreviation: String,
}

impl Committee {
    pub fn new(name: impl Into<String>, abbreviation: impl Into<String>) -> Self {
        Self {
            id: CommitteeId::new(),
            name: name.into(),
            abbreviation: abbreviation.into(),
        }
    }
}

/// Committee recommendation on a petition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteAction {
    Adopt,
    Refer,
    NotSupport,
    AssignToReference,
}

impl VoteAction {
    /// Petition status after a vote with this action is recorded.
    pub fn resulting_status(self) -> PetitionStatus {
        match self {
            Self::Adopt => PetitionStatus::Voted,
            Self::NotSupport => PetitionStatus::Rejected,
            Self::Refer | Self::AssignToReference => PetitionStatus::InCommittee,
        }
    }
}

impl fmt::Display for VoteAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Adopt => "adopt",
            Self::Refer => "refer",
            Self::NotSupport => "not_support",
            Self::AssignToReference => "assign_to_reference",
        };
        f.write_str(s)
    }
}

/// Yes/no/abstain counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    pub yes: u32,
    pub no: u32,
    pub abstain: u32,
}

impl VoteTally {
    pub fn new(yes: u32, no: u32, abstain: u32) -> Self {
        Self { yes, no, abstain }
    }

    pub fn total(&self) -> u32 {
        self.yes + self.no + self.abstain
    }
}

/// Recorder sign-off on a vote.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Approval {
    pub approved_by: String,
    pub approved_at: DateTime<Utc>,
}

/// A vote recorded by a committee recorder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitteeVote {
    pub id: VoteId,
    pub petition: PetitionId,
    pub committee: CommitteeId,
    pub action: VoteAction,
    pub tally: VoteTally,
    pub recorded_by: String,
    pub recorded_at: DateTime<Utc>,
    pub approval: Option<Approval>,
}

impl CommitteeVote {
    pub fn new(
        petition: PetitionId,
        committee: CommitteeId,
        action: VoteAction,
        tally: VoteTally,
        recorded_by: impl Into<String>,
    ) -> Self {
        Self {
            id: VoteId::new(),
            petition,
            committee,
            action,
            tally,
            recorded_by: recorded_by.into(),
            recorded_at: Utc::now(),
            approval: None,
        }
    }

    pub fn is_approved(&self) -> bool {
        self.approval.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::change::ChangeSet;

    fn petition() -> Petition {
        Petition::new(
            "Extend pastoral term limits",
            Submitter {
                name: "Rev. Sarah Johnson".into(),
                email: "sjohnson@example.org".into(),
                organization: None,
            },
            CitationLabel::parse("¶324").unwrap(),
            Some("Longer appointments build continuity.".into()),
            Amendment::new("six", "ten", ChangeSet::new()),
        )
    }

    #[test]
    fn happy_path_transitions() {
        let mut p = petition();
        assert_eq!(p.status, PetitionStatus::Submitted);
        let committee = CommitteeId::new();
        p.assign_to(committee).unwrap();
        assert_eq!(p.committee, Some(committee));
        p.advance(PetitionStatus::Voted).unwrap();
        p.advance(PetitionStatus::Approved).unwrap();
        assert!(p.status.is_terminal());
    }

    #[test]
    fn reassignment_is_allowed_before_votes() {
        let mut p = petition();
        p.assign_to(CommitteeId::new()).unwrap();
        let second = CommitteeId::new();
        p.assign_to(second).unwrap();
        assert_eq!(p.committee, Some(second));
    }

    #[test]
    fn cannot_vote_before_assignment() {
        let mut p = petition();
        let err = p.advance(PetitionStatus::Voted).unwrap_err();
        assert_eq!(
            err,
            TypeError::InvalidTransition {
                from: PetitionStatus::Submitted,
                to: PetitionStatus::Voted,
            }
        );
        assert_eq!(p.status, PetitionStatus::Submitted);
    }

    #[test]
    fn terminal_states_are_final() {
        for terminal in [PetitionStatus::Approved, PetitionStatus::Rejected] {
            for next in [
                PetitionStatus::Submitted,
                PetitionStatus::Assigned,
                PetitionStatus::InCommittee,
                PetitionStatus::Voted,
                PetitionStatus::Approved,
                PetitionStatus::Rejected,
            ] {
                assert!(!terminal.can_transition_to(next), "{terminal} -> {next}");
            }
        }
    }

    #[test]
    fn committee_may_keep_deliberating() {
        assert!(PetitionStatus::InCommittee.can_transition_to(PetitionStatus::InCommittee));
        assert!(PetitionStatus::InCommittee.can_transition_to(PetitionStatus::Voted));
    }

    #[test]
    fn vote_action_outcomes() {
        assert_eq!(VoteAction::Adopt.resulting_status(), PetitionStatus::Voted);
        assert_eq!(VoteAction::NotSupport.resulting_status(), PetitionStatus::Rejected);
        assert_eq!(VoteAction::Refer.resulting_status(), PetitionStatus::InCommittee);
        assert_eq!(
            VoteAction::AssignToReference.resulting_status(),
            PetitionStatus::InCommittee
        );
    }

    #[test]
    fn tally_total() {
        assert_eq!(VoteTally::new(45, 12, 3).total(), 60);
    }

    #[test]
    fn status_wire_names() {
        assert_eq!(
            serde_json::to_string(&PetitionStatus::InCommittee).unwrap(),
            "\"in_committee\""
        );
        assert_eq!(
            serde_json::to_string(&VoteAction::AssignToReference).unwrap(),
            "\"assign_to_reference\""
        );
    }
}
