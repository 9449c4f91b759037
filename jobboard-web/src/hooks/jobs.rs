//! Job-specific actions: duplication, saved jobs and per-job applications.

use shared::models::{Application, EntityId, Job};

use super::ResourceHook;
use crate::api::{ApiError, JobActionsApi, ResourceApi};
use crate::resource::Jobs;
use crate::store::{Action, JobsAction, ListAction};

impl<A> ResourceHook<Jobs, A>
where
    A: ResourceApi<Jobs> + JobActionsApi + 'static,
{
    /// Copies a job server-side and prepends the copy.
    ///
    /// # Errors
    /// Returns the API error, which is also recorded in the slice.
    pub async fn duplicate(&self, id: EntityId) -> Result<Job, ApiError> {
        match self.api.duplicate_job(id).await {
            Ok(copy) => {
                self.dispatch(ListAction::Add(copy.clone()));
                self.settled();
                Ok(copy)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Saves an unsaved job or unsaves a saved one. Returns whether the job
    /// is saved afterwards.
    ///
    /// # Errors
    /// Returns the API error, which is also recorded in the slice.
    pub async fn toggle_saved(&self, id: EntityId) -> Result<bool, ApiError> {
        let saved = self.store.select(|state| state.jobs.is_saved(id));
        let confirmed = if saved {
            self.api.unsave_job(id).await
        } else {
            self.api.save_job(id).await
        };
        match confirmed {
            Ok(()) => {
                self.store.dispatch(Action::Jobs(JobsAction::ToggleSaved(id)));
                Ok(!saved)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Replaces the saved-job set with the server's.
    ///
    /// # Errors
    /// Returns the API error, which is also recorded in the slice.
    pub async fn load_saved(&self) -> Result<Vec<EntityId>, ApiError> {
        match self.api.saved_job_ids().await {
            Ok(ids) => {
                self.store
                    .dispatch(Action::Jobs(JobsAction::SetSaved(ids.clone())));
                Ok(ids)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Loads the applications received for one job.
    ///
    /// # Errors
    /// Returns the API error, which is also recorded in the slice.
    pub async fn load_applications(&self, job_id: EntityId) -> Result<Vec<Application>, ApiError> {
        match self.api.job_applications(job_id).await {
            Ok(applications) => {
                self.store.dispatch(Action::Jobs(JobsAction::SetApplicationsForJob {
                    job_id,
                    applications: applications.clone(),
                }));
                Ok(applications)
            }
            Err(err) => Err(self.fail(err)),
        }
    }
}
