use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use super::EntityId;
use super::filters::{FilterSet, Pagination, merge_text, push_id, push_pagination, push_text};

/// State of a company–university partner programme.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum PartnerStatus {
    #[default]
    Proposed,
    Active,
    Ended,
}

/// A partner programme linking a company and a university.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartnerProgramme {
    pub id: EntityId,
    pub company_id: EntityId,
    pub university_id: EntityId,
    pub name: String,
    pub description: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: PartnerStatus,
}

/// Body of partner programme create and update requests.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerDraft {
    pub company_id: EntityId,
    pub university_id: EntityId,
    pub name: String,
    pub description: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: PartnerStatus,
}

/// Filters for the partner programme list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerFilters {
    pub name: Option<String>,
    pub company_id: Option<EntityId>,
    pub university_id: Option<EntityId>,
    pub pagination: Pagination,
}

/// Partial update for [`PartnerFilters`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PartnerFilterPatch {
    pub name: Option<String>,
    pub company_id: Option<Option<EntityId>>,
    pub university_id: Option<Option<EntityId>>,
    pub no: Option<u32>,
    pub limit: Option<u32>,
}

impl FilterSet for PartnerFilters {
    type Patch = PartnerFilterPatch;

    fn pagination(&self) -> Pagination {
        self.pagination
    }

    fn apply(&mut self, patch: PartnerFilterPatch) {
        merge_text(&mut self.name, patch.name);
        if let Some(company_id) = patch.company_id {
            self.company_id = company_id;
        }
        if let Some(university_id) = patch.university_id {
            self.university_id = university_id;
        }
        self.pagination.apply(patch.no, patch.limit);
    }

    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_text(&mut pairs, "name", self.name.as_ref());
        push_id(&mut pairs, "companyId", self.company_id);
        push_id(&mut pairs, "universityId", self.university_id);
        push_pagination(&mut pairs, self.pagination);
        pairs
    }
}
