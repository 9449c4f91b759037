//! Applying for jobs and withdrawing applications.

use shared::models::{Application, ApplicationDraft, EntityId};

use super::ResourceHook;
use crate::api::{ApiError, ApplicationActionsApi, ResourceApi};
use crate::resource::{Applications, Jobs, Resource};
use crate::store::{Action, JobsAction, ListAction};

impl<A> ResourceHook<Applications, A>
where
    A: ResourceApi<Applications> + ApplicationActionsApi + 'static,
{
    /// Submits an application for a job.
    ///
    /// The job lists are invalidated too since applying changes the job's
    /// applicant count.
    ///
    /// # Errors
    /// Returns the API error, which is also recorded in the slice.
    pub async fn apply(&self, draft: &ApplicationDraft) -> Result<Application, ApiError> {
        match self.api.apply(draft).await {
            Ok(application) => {
                self.dispatch(ListAction::Add(application.clone()));
                self.sync_job_view(&application);
                self.settled();
                self.queries.invalidate(Jobs::NAME);
                Ok(application)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Withdraws an application.
    ///
    /// # Errors
    /// Returns the API error, which is also recorded in the slice.
    pub async fn withdraw(&self, id: EntityId) -> Result<Application, ApiError> {
        match self.api.withdraw(id).await {
            Ok(application) => {
                self.dispatch(ListAction::Update(application.clone()));
                self.sync_job_view(&application);
                self.settled();
                Ok(application)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    fn sync_job_view(&self, application: &Application) {
        self.store
            .dispatch(Action::Jobs(JobsAction::UpsertApplication(application.clone())));
    }
}
