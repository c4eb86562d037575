use amend_types::{Amendment, CitationLabel, Petition, Submitter};
use serde::{Deserialize, Serialize};

use crate::error::{WorkflowError, WorkflowResult};

/// Petition metadata collected alongside an edit session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetitionDraft {
    pub title: String,
    pub submitter: Submitter,
    #[serde(default)]
    pub rationale: Option<String>,
}

impl PetitionDraft {
    pub fn new(title: impl Into<String>, submitter: Submitter) -> Self {
        Self {
            title: title.into(),
            submitter,
            rationale: None,
        }
    }

    pub fn with_rationale(mut self, rationale: impl Into<String>) -> Self {
        self.rationale = Some(rationale.into());
        self
    }

    /// Title, submitter name and a plausible email are required.
    pub fn validate(&self) -> WorkflowResult<()> {
        if self.title.trim().is_empty() {
            return Err(WorkflowError::InvalidDraft("title is required".into()));
        }
        if self.submitter.name.trim().is_empty() {
            return Err(WorkflowError::InvalidDraft("submitter name is required".into()));
        }
        let email = self.submitter.email.trim();
        match email.split_once('@') {
            Some((user, domain)) if !user.is_empty() && domain.contains('.') => Ok(()),
            _ => Err(WorkflowError::InvalidDraft(format!(
                "invalid submitter email: {email:?}"
            ))),
        }
    }

    pub(crate) fn into_petition(self, paragraph: CitationLabel, amendment: Amendment) -> Petition {
        let rationale = self
            .rationale
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());
        Petition::new(
            self.title.trim(),
            self.submitter,
            paragraph,
            rationale,
            amendment,
        )
    }
}
