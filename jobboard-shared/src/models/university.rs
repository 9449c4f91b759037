use serde::{Deserialize, Serialize};

use super::EntityId;
use super::filters::{FilterSet, Pagination, merge_text, push_pagination, push_text};

/// A partner university.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct University {
    pub id: EntityId,
    pub name: String,
    pub code: String,
    pub address: Option<String>,
    pub website: Option<String>,
    pub logo_url: Option<String>,
}

/// Body of university create and update requests.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniversityDraft {
    pub name: String,
    pub code: String,
    pub address: Option<String>,
    pub website: Option<String>,
}

/// Filters for the university list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniversityFilters {
    pub name: Option<String>,
    pub pagination: Pagination,
}

/// Partial update for [`UniversityFilters`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UniversityFilterPatch {
    pub name: Option<String>,
    pub no: Option<u32>,
    pub limit: Option<u32>,
}

impl FilterSet for UniversityFilters {
    type Patch = UniversityFilterPatch;

    fn pagination(&self) -> Pagination {
        self.pagination
    }

    fn apply(&mut self, patch: UniversityFilterPatch) {
        merge_text(&mut self.name, patch.name);
        self.pagination.apply(patch.no, patch.limit);
    }

    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_text(&mut pairs, "name", self.name.as_ref());
        push_pagination(&mut pairs, self.pagination);
        pairs
    }
}
