//! Jobs slice: the job list plus the saved-job set and per-job application
//! lists that hang off it.

use std::collections::BTreeMap;

use serde::Serialize;
use shared::models::{Application, EntityId, Identified, Job, JobFilters};
use strum::AsRefStr;

use super::FileHandle;
use super::list::{EntityList, ListAction};

#[derive(Debug, Clone, PartialEq, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum JobsAction {
    List(ListAction<Job, JobFilters>),
    /// Saves an unsaved job or unsaves a saved one.
    ToggleSaved(EntityId),
    SetSaved(Vec<EntityId>),
    SetApplicationsForJob {
        job_id: EntityId,
        applications: Vec<Application>,
    },
    /// Refreshes one application inside an already loaded per-job list.
    UpsertApplication(Application),
    /// Spreadsheet picked for bulk import, kept until the upload finishes.
    SetPendingImport(Option<FileHandle>),
}

impl JobsAction {
    /// Stable action name, e.g. `set_list` or `toggle_saved`.
    pub fn name(&self) -> &str {
        match self {
            Self::List(action) => action.as_ref(),
            other => other.as_ref(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JobsState {
    list: EntityList<Job, JobFilters>,
    saved_job_ids: Vec<EntityId>,
    applications_by_job: BTreeMap<EntityId, Vec<Application>>,
    #[serde(skip)]
    pending_import: Option<FileHandle>,
}

impl JobsState {
    pub fn list(&self) -> &EntityList<Job, JobFilters> {
        &self.list
    }

    pub fn saved_job_ids(&self) -> &[EntityId] {
        &self.saved_job_ids
    }

    pub fn is_saved(&self, id: EntityId) -> bool {
        self.saved_job_ids.contains(&id)
    }

    /// Applications loaded for a job, if any were fetched.
    pub fn applications_for(&self, job_id: EntityId) -> Option<&[Application]> {
        self.applications_by_job.get(&job_id).map(Vec::as_slice)
    }

    pub fn pending_import(&self) -> Option<&FileHandle> {
        self.pending_import.as_ref()
    }

    pub fn reduce(&mut self, action: JobsAction) {
        match action {
            JobsAction::List(ListAction::Remove(id)) => {
                self.list.reduce(ListAction::Remove(id));
                self.saved_job_ids.retain(|saved| *saved != id);
                self.applications_by_job.remove(&id);
            }
            JobsAction::List(action) => self.list.reduce(action),
            JobsAction::ToggleSaved(id) => {
                if self.is_saved(id) {
                    self.saved_job_ids.retain(|saved| *saved != id);
                } else {
                    self.saved_job_ids.push(id);
                }
            }
            JobsAction::SetSaved(ids) => {
                let mut unique = Vec::with_capacity(ids.len());
                for id in ids {
                    if !unique.contains(&id) {
                        unique.push(id);
                    }
                }
                self.saved_job_ids = unique;
            }
            JobsAction::SetApplicationsForJob {
                job_id,
                applications,
            } => {
                let mut unique: Vec<Application> = Vec::with_capacity(applications.len());
                for application in applications {
                    if !unique.iter().any(|kept| kept.id == application.id) {
                        unique.push(application);
                    }
                }
                self.applications_by_job.insert(job_id, unique);
            }
            JobsAction::UpsertApplication(application) => {
                if let Some(applications) = self.applications_by_job.get_mut(&application.job.id) {
                    match applications
                        .iter()
                        .position(|existing| existing.id() == application.id())
                    {
                        Some(index) => applications[index] = application,
                        None => applications.insert(0, application),
                    }
                }
            }
            JobsAction::SetPendingImport(handle) => self.pending_import = handle,
        }
    }
}
