//! Candidates slice: the candidate list plus the CV picked for upload.

use serde::Serialize;
use shared::models::{Candidate, CandidateFilters};
use strum::AsRefStr;

use super::FileHandle;
use super::list::{EntityList, ListAction};

#[derive(Debug, Clone, PartialEq, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum CandidatesAction {
    List(ListAction<Candidate, CandidateFilters>),
    /// CV file chosen in the profile form, held until it is uploaded.
    SetCvUpload(Option<FileHandle>),
}

impl CandidatesAction {
    pub fn name(&self) -> &str {
        match self {
            Self::List(action) => action.as_ref(),
            other => other.as_ref(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CandidatesState {
    list: EntityList<Candidate, CandidateFilters>,
    #[serde(skip)]
    cv_upload: Option<FileHandle>,
}

impl CandidatesState {
    pub fn list(&self) -> &EntityList<Candidate, CandidateFilters> {
        &self.list
    }

    pub fn cv_upload(&self) -> Option<&FileHandle> {
        self.cv_upload.as_ref()
    }

    pub fn reduce(&mut self, action: CandidatesAction) {
        match action {
            CandidatesAction::List(action) => self.list.reduce(action),
            CandidatesAction::SetCvUpload(handle) => self.cv_upload = handle,
        }
    }
}
