//! In-process API used by the hook tests.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use async_trait::async_trait;
use futures::channel::oneshot;
use shared::models::{
    Application, ApplicationDraft, ApplicationStatus, EntityId, FilterSet, Job, JobDraft,
    LoginRequest, LoginResponse, Page, RegisterRequest, Role, SessionUser,
};

use crate::api::{ApiError, ApplicationActionsApi, AuthApi, JobActionsApi, ResourceApi};
use crate::resource::{Applications, Jobs, Resource};

pub const EMAIL: &str = "a@x.com";
pub const PASSWORD: &str = "secret";

#[derive(Debug, Default)]
pub struct FakeApi {
    pub jobs: RefCell<Vec<Job>>,
    pub applications: RefCell<Vec<Application>>,
    pub saved: RefCell<Vec<EntityId>>,
    pub profile: RefCell<Option<SessionUser>>,
    pub token: RefCell<Option<String>>,
    pub list_calls: Cell<usize>,
    pub mutation_calls: Cell<usize>,
    failure: RefCell<Option<ApiError>>,
    gates: RefCell<HashMap<String, oneshot::Receiver<()>>>,
    next_id: Cell<EntityId>,
}

impl FakeApi {
    pub fn with_jobs(jobs: Vec<Job>) -> Self {
        let next_id = jobs.iter().map(|job| job.id).max().unwrap_or(0) + 1;
        let api = Self::default();
        *api.jobs.borrow_mut() = jobs;
        api.next_id.set(next_id);
        api
    }

    /// Holds list responses for `params` until the returned sender fires.
    pub fn gate(&self, params: &str) -> oneshot::Sender<()> {
        let (release, gate) = oneshot::channel();
        self.gates.borrow_mut().insert(params.to_string(), gate);
        release
    }

    /// Makes the next call fail with `err`.
    pub fn fail_next(&self, err: ApiError) {
        *self.failure.borrow_mut() = Some(err);
    }

    fn take_failure(&self) -> Result<(), ApiError> {
        match self.failure.borrow_mut().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn next_id(&self) -> EntityId {
        let id = self.next_id.get().max(1);
        self.next_id.set(id + 1);
        id
    }

    fn mutation(&self) -> Result<(), ApiError> {
        self.mutation_calls.set(self.mutation_calls.get() + 1);
        self.take_failure()
    }

    async fn wait_for_gate<F: FilterSet>(&self, filters: &F) {
        let gate = self.gates.borrow_mut().remove(&filters.cache_key());
        if let Some(gate) = gate {
            let _ = gate.await;
        }
    }

    fn job(&self, id: EntityId) -> Result<Job, ApiError> {
        self.jobs
            .borrow()
            .iter()
            .find(|job| job.id == id)
            .cloned()
            .ok_or_else(|| ApiError::new(Some(404), "Job not found"))
    }
}

fn job_from_draft(id: EntityId, draft: &JobDraft) -> Job {
    Job {
        id,
        title: draft.title.clone(),
        company_id: draft.company_id,
        category_ids: draft.category_ids.clone(),
        location: draft.location.clone(),
        salary_min: draft.salary_min,
        salary_max: draft.salary_max,
        description: draft.description.clone(),
        status: draft.status,
        ..Job::default()
    }
}

#[async_trait(?Send)]
impl ResourceApi<Jobs> for FakeApi {
    async fn list(&self, filters: &<Jobs as Resource>::Filters) -> Result<Page<Job>, ApiError> {
        self.list_calls.set(self.list_calls.get() + 1);
        self.wait_for_gate(filters).await;
        self.take_failure()?;
        let items: Vec<Job> = self
            .jobs
            .borrow()
            .iter()
            .filter(|job| {
                filters
                    .name
                    .as_ref()
                    .is_none_or(|name| job.title.contains(name.as_str()))
            })
            .cloned()
            .collect();
        let total = items.len() as u64;
        Ok(Page::new(items, total))
    }

    async fn get(&self, id: EntityId) -> Result<Job, ApiError> {
        self.take_failure()?;
        self.job(id)
    }

    async fn create(&self, draft: &JobDraft) -> Result<Job, ApiError> {
        self.mutation()?;
        let job = job_from_draft(self.next_id(), draft);
        self.jobs.borrow_mut().insert(0, job.clone());
        Ok(job)
    }

    async fn update(&self, id: EntityId, draft: &JobDraft) -> Result<Job, ApiError> {
        self.mutation()?;
        self.job(id)?;
        let job = job_from_draft(id, draft);
        for existing in self.jobs.borrow_mut().iter_mut() {
            if existing.id == id {
                *existing = job.clone();
            }
        }
        Ok(job)
    }

    async fn delete(&self, id: EntityId) -> Result<(), ApiError> {
        self.mutation()?;
        self.job(id)?;
        self.jobs.borrow_mut().retain(|job| job.id != id);
        Ok(())
    }
}

#[async_trait(?Send)]
impl JobActionsApi for FakeApi {
    async fn duplicate_job(&self, id: EntityId) -> Result<Job, ApiError> {
        self.mutation()?;
        let mut copy = self.job(id)?;
        copy.id = self.next_id();
        copy.title = format!("{} (copy)", copy.title);
        copy.applicant_count = 0;
        self.jobs.borrow_mut().insert(0, copy.clone());
        Ok(copy)
    }

    async fn save_job(&self, id: EntityId) -> Result<(), ApiError> {
        self.mutation()?;
        self.saved.borrow_mut().push(id);
        Ok(())
    }

    async fn unsave_job(&self, id: EntityId) -> Result<(), ApiError> {
        self.mutation()?;
        self.saved.borrow_mut().retain(|saved| *saved != id);
        Ok(())
    }

    async fn saved_job_ids(&self) -> Result<Vec<EntityId>, ApiError> {
        self.take_failure()?;
        Ok(self.saved.borrow().clone())
    }

    async fn job_applications(&self, job_id: EntityId) -> Result<Vec<Application>, ApiError> {
        self.take_failure()?;
        Ok(self
            .applications
            .borrow()
            .iter()
            .filter(|application| application.job.id == job_id)
            .cloned()
            .collect())
    }
}

#[async_trait(?Send)]
impl ResourceApi<Applications> for FakeApi {
    async fn list(
        &self,
        filters: &<Applications as Resource>::Filters,
    ) -> Result<Page<Application>, ApiError> {
        self.list_calls.set(self.list_calls.get() + 1);
        self.wait_for_gate(filters).await;
        self.take_failure()?;
        let items = self.applications.borrow().clone();
        let total = items.len() as u64;
        Ok(Page::new(items, total))
    }

    async fn get(&self, id: EntityId) -> Result<Application, ApiError> {
        self.take_failure()?;
        self.applications
            .borrow()
            .iter()
            .find(|application| application.id == id)
            .cloned()
            .ok_or_else(|| ApiError::new(Some(404), "Application not found"))
    }

    async fn create(&self, draft: &ApplicationDraft) -> Result<Application, ApiError> {
        self.apply(draft).await
    }

    async fn update(&self, id: EntityId, draft: &ApplicationDraft) -> Result<Application, ApiError> {
        self.mutation()?;
        let mut applications = self.applications.borrow_mut();
        let application = applications
            .iter_mut()
            .find(|application| application.id == id)
            .ok_or_else(|| ApiError::new(Some(404), "Application not found"))?;
        application.cover_letter = draft.cover_letter.clone();
        application.cv_url = draft.cv_url.clone();
        Ok(application.clone())
    }

    async fn delete(&self, id: EntityId) -> Result<(), ApiError> {
        self.mutation()?;
        self.applications
            .borrow_mut()
            .retain(|application| application.id != id);
        Ok(())
    }
}

#[async_trait(?Send)]
impl ApplicationActionsApi for FakeApi {
    async fn apply(&self, draft: &ApplicationDraft) -> Result<Application, ApiError> {
        self.mutation()?;
        let job = self.job(draft.job_id)?;
        let application = Application {
            id: self.next_id(),
            job,
            status: ApplicationStatus::Pending,
            cover_letter: draft.cover_letter.clone(),
            cv_url: draft.cv_url.clone(),
            ..Application::default()
        };
        self.applications.borrow_mut().insert(0, application.clone());
        Ok(application)
    }

    async fn withdraw(&self, id: EntityId) -> Result<Application, ApiError> {
        self.mutation()?;
        let mut applications = self.applications.borrow_mut();
        let application = applications
            .iter_mut()
            .find(|application| application.id == id)
            .ok_or_else(|| ApiError::new(Some(404), "Application not found"))?;
        application.status = ApplicationStatus::Withdrawn;
        Ok(application.clone())
    }
}

#[async_trait(?Send)]
impl AuthApi for FakeApi {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.take_failure()?;
        if request.email != EMAIL || request.password != PASSWORD {
            return Err(ApiError::new(Some(401), "Invalid credentials"));
        }
        Ok(LoginResponse {
            token: "t1".into(),
            role: Role::Candidate,
            email: EMAIL.into(),
            avatar: None,
            id_user: 7,
        })
    }

    async fn register(&self, request: &RegisterRequest) -> Result<LoginResponse, ApiError> {
        self.take_failure()?;
        Ok(LoginResponse {
            token: "t2".into(),
            role: request.role,
            email: request.email.clone(),
            avatar: None,
            id_user: self.next_id(),
        })
    }

    async fn profile(&self) -> Result<SessionUser, ApiError> {
        self.take_failure()?;
        if self.token.borrow().is_none() {
            return Err(ApiError::new(Some(401), "Unauthorized"));
        }
        self.profile
            .borrow()
            .clone()
            .ok_or_else(|| ApiError::new(Some(404), "Profile not found"))
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.take_failure()
    }

    fn set_token(&self, token: Option<String>) {
        *self.token.borrow_mut() = token;
    }
}
