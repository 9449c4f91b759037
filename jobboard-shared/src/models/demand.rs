use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use super::EntityId;
use super::filters::{FilterSet, Pagination, merge_text, push_id, push_pagination, push_text};

/// Lifecycle of a placement demand.
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
pub enum DemandStatus {
    #[default]
    Open,
    Fulfilled,
    Closed,
}

/// A university's request for graduate placements.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Demand {
    pub id: EntityId,
    pub university_id: EntityId,
    pub university_name: String,
    pub title: String,
    pub major: String,
    pub quantity: u32,
    pub description: String,
    pub status: DemandStatus,
    pub deadline: Option<NaiveDate>,
}

/// Body of demand create and update requests.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemandDraft {
    pub university_id: EntityId,
    pub title: String,
    pub major: String,
    pub quantity: u32,
    pub description: String,
    pub status: DemandStatus,
    pub deadline: Option<NaiveDate>,
}

/// Filters for the demand list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemandFilters {
    pub name: Option<String>,
    pub university_id: Option<EntityId>,
    pub major: Option<String>,
    pub status: Option<DemandStatus>,
    pub pagination: Pagination,
}

/// Partial update for [`DemandFilters`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DemandFilterPatch {
    pub name: Option<String>,
    pub university_id: Option<Option<EntityId>>,
    pub major: Option<String>,
    pub status: Option<Option<DemandStatus>>,
    pub no: Option<u32>,
    pub limit: Option<u32>,
}

impl FilterSet for DemandFilters {
    type Patch = DemandFilterPatch;

    fn pagination(&self) -> Pagination {
        self.pagination
    }

    fn apply(&mut self, patch: DemandFilterPatch) {
        merge_text(&mut self.name, patch.name);
        merge_text(&mut self.major, patch.major);
        if let Some(university_id) = patch.university_id {
            self.university_id = university_id;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        self.pagination.apply(patch.no, patch.limit);
    }

    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_text(&mut pairs, "name", self.name.as_ref());
        push_id(&mut pairs, "universityId", self.university_id);
        push_text(&mut pairs, "major", self.major.as_ref());
        if let Some(status) = self.status {
            pairs.push(("status", status.to_string()));
        }
        push_pagination(&mut pairs, self.pagination);
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demand_parses_deadline() {
        let demand: Demand =
            serde_json::from_str(r#"{"id":2,"universityId":5,"deadline":"2026-06-30","status":"FULFILLED"}"#)
                .unwrap();
        assert_eq!(demand.deadline, NaiveDate::from_ymd_opt(2026, 6, 30));
        assert_eq!(demand.status, DemandStatus::Fulfilled);
    }
}
