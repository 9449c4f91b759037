use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use super::filters::{FilterSet, Pagination, merge_text, push_id, push_pagination, push_text};
use super::{EntityId, Job};

/// Review state of an application.
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
pub enum ApplicationStatus {
    #[default]
    Pending,
    Reviewing,
    Interview,
    Accepted,
    Rejected,
    Withdrawn,
}

impl ApplicationStatus {
    /// Whether the candidate can still withdraw.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Pending | Self::Reviewing | Self::Interview)
    }
}

/// A candidate's application to a job.
///
/// `job` is the snapshot the server embedded at fetch time. Updating the job
/// elsewhere does not touch it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Application {
    pub id: EntityId,
    pub job: Job,
    pub candidate_id: EntityId,
    pub status: ApplicationStatus,
    pub cover_letter: String,
    pub cv_url: Option<String>,
    pub applied_at: Option<DateTime<Utc>>,
}

/// Body of the apply request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDraft {
    pub job_id: EntityId,
    pub cover_letter: String,
    pub cv_url: Option<String>,
}

/// Filters for the application list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationFilters {
    pub name: Option<String>,
    pub job_id: Option<EntityId>,
    pub status: Option<ApplicationStatus>,
    pub pagination: Pagination,
}

/// Partial update for [`ApplicationFilters`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ApplicationFilterPatch {
    pub name: Option<String>,
    pub job_id: Option<Option<EntityId>>,
    pub status: Option<Option<ApplicationStatus>>,
    pub no: Option<u32>,
    pub limit: Option<u32>,
}

impl FilterSet for ApplicationFilters {
    type Patch = ApplicationFilterPatch;

    fn pagination(&self) -> Pagination {
        self.pagination
    }

    fn apply(&mut self, patch: ApplicationFilterPatch) {
        merge_text(&mut self.name, patch.name);
        if let Some(job_id) = patch.job_id {
            self.job_id = job_id;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        self.pagination.apply(patch.no, patch.limit);
    }

    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_text(&mut pairs, "name", self.name.as_ref());
        push_id(&mut pairs, "jobId", self.job_id);
        if let Some(status) = self.status {
            pairs.push(("status", status.to_string()));
        }
        push_pagination(&mut pairs, self.pagination);
        pairs
    }
}
