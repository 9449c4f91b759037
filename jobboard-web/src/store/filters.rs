//! Saved filter sets.
//!
//! A side mapping from a caller-chosen key to a snapshot of one domain's
//! filters, so a search can be stashed and restored later.

use std::collections::BTreeMap;

use serde::Serialize;
use shared::models::{
    ApplicationFilters, CandidateFilters, CompanyFilters, DemandFilters, JobFilters,
    PartnerFilters, UniversityFilters,
};
use strum::AsRefStr;

/// Filters of one domain, tagged with the domain they belong to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "domain", content = "filters", rename_all = "snake_case")]
pub enum FilterSnapshot {
    Jobs(JobFilters),
    Applications(ApplicationFilters),
    Candidates(CandidateFilters),
    Companies(CompanyFilters),
    Universities(UniversityFilters),
    Demands(DemandFilters),
    Partner(PartnerFilters),
}

impl FilterSnapshot {
    /// Slice key of the domain the snapshot belongs to.
    pub fn domain(&self) -> &'static str {
        match self {
            Self::Jobs(_) => "jobs",
            Self::Applications(_) => "applications",
            Self::Candidates(_) => "candidates",
            Self::Companies(_) => "companies",
            Self::Universities(_) => "universities",
            Self::Demands(_) => "demands",
            Self::Partner(_) => "partner",
        }
    }
}

#[derive(Debug, Clone, PartialEq, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum FiltersAction {
    Save {
        key: String,
        snapshot: FilterSnapshot,
    },
    Remove(String),
    Clear,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SavedFilters {
    entries: BTreeMap<String, FilterSnapshot>,
}

impl SavedFilters {
    pub fn get(&self, key: &str) -> Option<&FilterSnapshot> {
        self.entries.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn reduce(&mut self, action: FiltersAction) {
        match action {
            FiltersAction::Save { key, snapshot } => {
                self.entries.insert(key, snapshot);
            }
            FiltersAction::Remove(key) => {
                self.entries.remove(&key);
            }
            FiltersAction::Clear => self.entries.clear(),
        }
    }
}
