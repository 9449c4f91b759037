use serde::{Deserialize, Serialize};

use super::EntityId;
use super::filters::{FilterSet, Pagination, merge_text, push_id, push_pagination, push_text};

/// A candidate profile.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Candidate {
    pub id: EntityId,
    pub user_id: EntityId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub skills: Vec<String>,
    pub cv_url: Option<String>,
    pub university_id: Option<EntityId>,
}

impl Candidate {
    /// First and last name joined, skipping empty parts.
    #[must_use]
    pub fn full_name(&self) -> String {
        [self.first_name.as_str(), self.last_name.as_str()]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Body of candidate create and update requests.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub skills: Vec<String>,
    pub university_id: Option<EntityId>,
}

/// Filters for the candidate list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateFilters {
    pub name: Option<String>,
    pub skill: Option<String>,
    pub university_id: Option<EntityId>,
    pub pagination: Pagination,
}

/// Partial update for [`CandidateFilters`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CandidateFilterPatch {
    pub name: Option<String>,
    pub skill: Option<String>,
    pub university_id: Option<Option<EntityId>>,
    pub no: Option<u32>,
    pub limit: Option<u32>,
}

impl FilterSet for CandidateFilters {
    type Patch = CandidateFilterPatch;

    fn pagination(&self) -> Pagination {
        self.pagination
    }

    fn apply(&mut self, patch: CandidateFilterPatch) {
        merge_text(&mut self.name, patch.name);
        merge_text(&mut self.skill, patch.skill);
        if let Some(university_id) = patch.university_id {
            self.university_id = university_id;
        }
        self.pagination.apply(patch.no, patch.limit);
    }

    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_text(&mut pairs, "name", self.name.as_ref());
        push_text(&mut pairs, "skill", self.skill.as_ref());
        push_id(&mut pairs, "universityId", self.university_id);
        push_pagination(&mut pairs, self.pagination);
        pairs
    }
}
