use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use shared::config::ClientConfig;
use shared::models::{
    Application, ApplicationDraft, EntityId, FilterSet, Job, LoginRequest, LoginResponse, Page,
    RegisterRequest, SessionUser,
};
use tracing::{debug, warn};

use super::{ApiError, ApplicationActionsApi, AuthApi, JobActionsApi, ResourceApi};
use crate::resource::Resource;

/// HTTP client for the job board REST API.
#[derive(Clone, Debug)]
pub struct JobBoardClient {
    base_url: String,
    client: Client,
    token: Arc<Mutex<Option<String>>>,
}

impl JobBoardClient {
    /// Create a new API client with the provided base URL.
    pub fn new(base_url: &str) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a client from loaded configuration, applying its request
    /// timeout where the platform supports one.
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        #[cfg(not(target_arch = "wasm32"))]
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()?;
        #[cfg(target_arch = "wasm32")]
        let client = Client::builder().build()?;

        Ok(Self::with_client(&config.api_base_url, client))
    }

    fn with_client(base_url: &str, client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            token: Arc::new(Mutex::new(None)),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn current_token(&self) -> Option<String> {
        self.token
            .lock()
            .ok()
            .and_then(|guard| guard.as_ref().cloned())
    }

    fn apply_auth(&self, request: RequestBuilder) -> RequestBuilder {
        if let Some(token) = self.current_token() {
            request.bearer_auth(token)
        } else {
            request
        }
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = self.apply_auth(request).send().await.map_err(|err| {
            warn!(error = %err, "request failed before a response arrived");
            ApiError::from(err)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = ApiError::from_response(status.as_u16(), &body);
        warn!(status = status.as_u16(), message = err.message(), "request rejected");
        Err(err)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = self.execute(request).await?;
        Ok(response.json().await?)
    }

    async fn send_empty(&self, request: RequestBuilder) -> Result<(), ApiError> {
        self.execute(request).await.map(drop)
    }
}

#[async_trait(?Send)]
impl<R: Resource> ResourceApi<R> for JobBoardClient {
    async fn list(&self, filters: &R::Filters) -> Result<Page<R::Entity>, ApiError> {
        let url = self.api_url(R::PATH);
        debug!(domain = R::NAME, query = %filters.cache_key(), "list");
        self.send(self.client.get(url).query(&filters.query_pairs()))
            .await
    }

    async fn get(&self, id: EntityId) -> Result<R::Entity, ApiError> {
        let url = self.api_url(&format!("{}/{id}", R::PATH));
        self.send(self.client.get(url)).await
    }

    async fn create(&self, draft: &R::Draft) -> Result<R::Entity, ApiError> {
        let url = self.api_url(R::PATH);
        self.send(self.client.post(url).json(draft)).await
    }

    async fn update(&self, id: EntityId, draft: &R::Draft) -> Result<R::Entity, ApiError> {
        let url = self.api_url(&format!("{}/{id}", R::PATH));
        self.send(self.client.put(url).json(draft)).await
    }

    async fn delete(&self, id: EntityId) -> Result<(), ApiError> {
        let url = self.api_url(&format!("{}/{id}", R::PATH));
        self.send_empty(self.client.delete(url)).await
    }
}

#[async_trait(?Send)]
impl JobActionsApi for JobBoardClient {
    async fn duplicate_job(&self, id: EntityId) -> Result<Job, ApiError> {
        let url = self.api_url(&format!("jobs/{id}/duplicate"));
        self.send(self.client.post(url)).await
    }

    async fn save_job(&self, id: EntityId) -> Result<(), ApiError> {
        let url = self.api_url(&format!("jobs/{id}/save"));
        self.send_empty(self.client.post(url)).await
    }

    async fn unsave_job(&self, id: EntityId) -> Result<(), ApiError> {
        let url = self.api_url(&format!("jobs/{id}/save"));
        self.send_empty(self.client.delete(url)).await
    }

    async fn saved_job_ids(&self) -> Result<Vec<EntityId>, ApiError> {
        let url = self.api_url("jobs/saved");
        self.send(self.client.get(url)).await
    }

    async fn job_applications(&self, job_id: EntityId) -> Result<Vec<Application>, ApiError> {
        let url = self.api_url(&format!("jobs/{job_id}/applications"));
        self.send(self.client.get(url)).await
    }
}

#[async_trait(?Send)]
impl ApplicationActionsApi for JobBoardClient {
    async fn apply(&self, draft: &ApplicationDraft) -> Result<Application, ApiError> {
        let url = self.api_url("applications");
        self.send(self.client.post(url).json(draft)).await
    }

    async fn withdraw(&self, id: EntityId) -> Result<Application, ApiError> {
        let url = self.api_url(&format!("applications/{id}/withdraw"));
        self.send(self.client.post(url)).await
    }
}

#[async_trait(?Send)]
impl AuthApi for JobBoardClient {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let url = self.api_url("auth/login");
        self.send(self.client.post(url).json(request)).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<LoginResponse, ApiError> {
        let url = self.api_url("auth/register");
        self.send(self.client.post(url).json(request)).await
    }

    async fn profile(&self) -> Result<SessionUser, ApiError> {
        let url = self.api_url("auth/me");
        self.send(self.client.get(url)).await
    }

    async fn logout(&self) -> Result<(), ApiError> {
        let url = self.api_url("auth/logout");
        self.send_empty(self.client.post(url)).await
    }

    fn set_token(&self, token: Option<String>) {
        if let Ok(mut guard) = self.token.lock() {
            *guard = token;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::Jobs;
    use shared::models::JobFilters;

    #[test]
    fn urls_join_without_double_slashes() {
        let client = JobBoardClient::new("http://localhost:8080/api/");
        assert_eq!(client.base_url(), "http://localhost:8080/api");
        assert_eq!(client.api_url("/jobs/3"), "http://localhost:8080/api/jobs/3");
        assert_eq!(client.api_url("auth/me"), "http://localhost:8080/api/auth/me");
    }

    #[test]
    fn token_is_shared_between_clones() {
        let client = JobBoardClient::new("/api");
        let clone = client.clone();
        client.set_token(Some("t1".into()));
        assert_eq!(clone.current_token().as_deref(), Some("t1"));
        clone.set_token(None);
        assert_eq!(client.current_token(), None);
    }

    #[test]
    fn from_config_uses_base_url() {
        let config = ClientConfig {
            api_base_url: "https://jobs.example.com/api".into(),
            ..ClientConfig::default()
        };
        let client = JobBoardClient::from_config(&config).unwrap();
        assert_eq!(client.base_url(), "https://jobs.example.com/api");
    }

    #[tokio::test]
    async fn unreachable_server_is_a_network_error() {
        let client = JobBoardClient::new("http://127.0.0.1:1/api");
        let err = ResourceApi::<Jobs>::list(&client, &JobFilters::default())
            .await
            .unwrap_err();
        assert_eq!(err.status(), None);
        assert_eq!(err.message(), "Unable to connect to server");
    }
}
