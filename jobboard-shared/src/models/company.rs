use serde::{Deserialize, Serialize};

use super::EntityId;
use super::filters::{FilterSet, Pagination, merge_text, push_pagination, push_text};

/// An employer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Company {
    pub id: EntityId,
    pub name: String,
    pub industry: Option<String>,
    pub website: Option<String>,
    pub logo_url: Option<String>,
    pub description: String,
    pub job_count: u32,
}

/// Body of company create and update requests.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDraft {
    pub name: String,
    pub industry: Option<String>,
    pub website: Option<String>,
    pub description: String,
}

/// Filters for the company list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyFilters {
    pub name: Option<String>,
    pub industry: Option<String>,
    pub pagination: Pagination,
}

/// Partial update for [`CompanyFilters`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompanyFilterPatch {
    pub name: Option<String>,
    pub industry: Option<String>,
    pub no: Option<u32>,
    pub limit: Option<u32>,
}

impl FilterSet for CompanyFilters {
    type Patch = CompanyFilterPatch;

    fn pagination(&self) -> Pagination {
        self.pagination
    }

    fn apply(&mut self, patch: CompanyFilterPatch) {
        merge_text(&mut self.name, patch.name);
        merge_text(&mut self.industry, patch.industry);
        self.pagination.apply(patch.no, patch.limit);
    }

    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_text(&mut pairs, "name", self.name.as_ref());
        push_text(&mut pairs, "industry", self.industry.as_ref());
        push_pagination(&mut pairs, self.pagination);
        pairs
    }
}
