use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use super::EntityId;
use super::filters::{
    FilterSet, Pagination, merge_text, push_id, push_ids, push_pagination, push_text,
};

/// Publication state of a job listing.
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
pub enum JobStatus {
    Draft,
    #[default]
    Open,
    Closed,
}

/// A job listing as returned by the API.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Job {
    pub id: EntityId,
    pub title: String,
    pub company_id: Option<EntityId>,
    pub company_name: String,
    pub category_ids: Vec<EntityId>,
    pub location: String,
    pub salary_min: Option<u64>,
    pub salary_max: Option<u64>,
    pub description: String,
    pub status: JobStatus,
    /// Server-computed; only a refetch brings it up to date.
    pub applicant_count: u32,
    pub created_at: Option<DateTime<Utc>>,
}

/// Body of job create and update requests.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDraft {
    pub title: String,
    pub company_id: Option<EntityId>,
    pub category_ids: Vec<EntityId>,
    pub location: String,
    pub salary_min: Option<u64>,
    pub salary_max: Option<u64>,
    pub description: String,
    pub status: JobStatus,
}

impl From<&Job> for JobDraft {
    fn from(job: &Job) -> Self {
        Self {
            title: job.title.clone(),
            company_id: job.company_id,
            category_ids: job.category_ids.clone(),
            location: job.location.clone(),
            salary_min: job.salary_min,
            salary_max: job.salary_max,
            description: job.description.clone(),
            status: job.status,
        }
    }
}

/// Filters for the job list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobFilters {
    pub name: Option<String>,
    pub category_ids: Vec<EntityId>,
    pub location: Option<String>,
    pub company_id: Option<EntityId>,
    pub status: Option<JobStatus>,
    pub pagination: Pagination,
}

/// Partial update for [`JobFilters`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JobFilterPatch {
    pub name: Option<String>,
    pub category_ids: Option<Vec<EntityId>>,
    pub location: Option<String>,
    pub company_id: Option<Option<EntityId>>,
    pub status: Option<Option<JobStatus>>,
    pub no: Option<u32>,
    pub limit: Option<u32>,
}

impl FilterSet for JobFilters {
    type Patch = JobFilterPatch;

    fn pagination(&self) -> Pagination {
        self.pagination
    }

    fn apply(&mut self, patch: JobFilterPatch) {
        merge_text(&mut self.name, patch.name);
        merge_text(&mut self.location, patch.location);
        if let Some(mut ids) = patch.category_ids {
            ids.sort_unstable();
            ids.dedup();
            self.category_ids = ids;
        }
        if let Some(company_id) = patch.company_id {
            self.company_id = company_id;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        self.pagination.apply(patch.no, patch.limit);
    }

    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_text(&mut pairs, "name", self.name.as_ref());
        push_ids(&mut pairs, "categoryIds", &self.category_ids);
        push_text(&mut pairs, "location", self.location.as_ref());
        push_id(&mut pairs, "companyId", self.company_id);
        if let Some(status) = self.status {
            pairs.push(("status", status.to_string()));
        }
        push_pagination(&mut pairs, self.pagination);
        pairs
    }
}
