//! Remote API surface.
//!
//! Hooks depend on these traits rather than on [`JobBoardClient`] so tests
//! can drive them with in-process fakes.

mod client;

use async_trait::async_trait;
use shared::models::{
    Application, ApplicationDraft, EntityId, ErrorResponse, Job, LoginRequest, LoginResponse,
    Page, RegisterRequest, SessionUser,
};
use thiserror::Error;

use crate::resource::Resource;

pub use client::JobBoardClient;

/// Normalized API failure: optional HTTP status plus a display message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
    status: Option<u16>,
    message: String,
}

impl ApiError {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Failure before any response arrived.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(None, message)
    }

    /// Builds an error from a non-success response, reading the message out
    /// of the body when there is one.
    pub fn from_response(status: u16, body: &str) -> Self {
        Self::new(Some(status), ErrorResponse::from_body(body).message)
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == Some(401)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        let status = err.status().map(|status| status.as_u16());
        let message = if err.is_timeout() {
            "Request timed out"
        } else if err.is_decode() {
            "Unexpected response from server"
        } else {
            "Unable to connect to server"
        };
        Self::new(status, message)
    }
}

/// CRUD endpoints of one domain.
#[async_trait(?Send)]
pub trait ResourceApi<R: Resource> {
    /// Fetches the page matching `filters`.
    async fn list(&self, filters: &R::Filters) -> Result<Page<R::Entity>, ApiError>;

    async fn get(&self, id: EntityId) -> Result<R::Entity, ApiError>;

    async fn create(&self, draft: &R::Draft) -> Result<R::Entity, ApiError>;

    async fn update(&self, id: EntityId, draft: &R::Draft) -> Result<R::Entity, ApiError>;

    async fn delete(&self, id: EntityId) -> Result<(), ApiError>;
}

/// Job endpoints beyond CRUD.
#[async_trait(?Send)]
pub trait JobActionsApi {
    /// Copies a job server-side and returns the copy.
    async fn duplicate_job(&self, id: EntityId) -> Result<Job, ApiError>;

    async fn save_job(&self, id: EntityId) -> Result<(), ApiError>;

    async fn unsave_job(&self, id: EntityId) -> Result<(), ApiError>;

    /// Ids of the jobs the current user has saved.
    async fn saved_job_ids(&self) -> Result<Vec<EntityId>, ApiError>;

    async fn job_applications(&self, job_id: EntityId) -> Result<Vec<Application>, ApiError>;
}

/// Application endpoints beyond CRUD.
#[async_trait(?Send)]
pub trait ApplicationActionsApi {
    async fn apply(&self, draft: &ApplicationDraft) -> Result<Application, ApiError>;

    /// Withdraws an application and returns it with its new status.
    async fn withdraw(&self, id: EntityId) -> Result<Application, ApiError>;
}

/// Session endpoints.
#[async_trait(?Send)]
pub trait AuthApi {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError>;

    async fn register(&self, request: &RegisterRequest) -> Result<LoginResponse, ApiError>;

    /// Profile of the user the current token belongs to.
    async fn profile(&self) -> Result<SessionUser, ApiError>;

    async fn logout(&self) -> Result<(), ApiError>;

    /// Sets or clears the bearer token sent with later requests.
    fn set_token(&self, token: Option<String>);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_errors_read_the_body() {
        let err = ApiError::from_response(422, r#"{"error":{"message":"Title is required"}}"#);
        assert_eq!(err.status(), Some(422));
        assert_eq!(err.to_string(), "Title is required");

        let err = ApiError::from_response(500, "<html>oops</html>");
        assert_eq!(err.message(), shared::models::errors::GENERIC_ERROR_MESSAGE);
    }

    #[test]
    fn unauthorized_is_detected_by_status() {
        assert!(ApiError::from_response(401, "{}").is_unauthorized());
        assert!(!ApiError::network("Unable to connect to server").is_unauthorized());
    }
}
