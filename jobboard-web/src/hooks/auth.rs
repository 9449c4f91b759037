//! Session lifecycle: sign-in, sign-out and the lazy profile fetch.

use std::fmt;
use std::rc::Rc;

use shared::models::{LoginRequest, LoginResponse, RegisterRequest, SessionUser};
use tracing::{debug, info, warn};

use crate::api::{ApiError, AuthApi};
use crate::query::QueryClient;
use crate::store::{Action, AuthAction, Credentials, Store};

/// Login, registration, logout and the lazy profile fetch.
pub struct AuthHook<A> {
    store: Store,
    queries: Rc<QueryClient>,
    api: Rc<A>,
}

impl<A> Clone for AuthHook<A> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            queries: Rc::clone(&self.queries),
            api: Rc::clone(&self.api),
        }
    }
}

impl<A> fmt::Debug for AuthHook<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthHook").finish_non_exhaustive()
    }
}

impl<A: AuthApi + 'static> AuthHook<A> {
    pub fn new(store: Store, queries: Rc<QueryClient>, api: Rc<A>) -> Self {
        Self {
            store,
            queries,
            api,
        }
    }

    /// Signs in with email and password.
    ///
    /// # Errors
    /// Returns the API error, which is also recorded in the auth slice.
    pub async fn login(&self, email: &str, password: &str) -> Result<SessionUser, ApiError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.dispatch(AuthAction::SetLoading(true));
        let response = self.api.login(&request).await;
        self.establish(response)
    }

    /// Creates an account and signs in with it.
    ///
    /// # Errors
    /// Returns the API error, which is also recorded in the auth slice.
    pub async fn register(&self, request: &RegisterRequest) -> Result<SessionUser, ApiError> {
        self.dispatch(AuthAction::SetLoading(true));
        let response = self.api.register(request).await;
        self.establish(response)
    }

    fn establish(
        &self,
        response: Result<LoginResponse, ApiError>,
    ) -> Result<SessionUser, ApiError> {
        match response {
            Ok(response) => {
                self.api.set_token(Some(response.token.clone()));
                self.dispatch(AuthAction::SetCredentials(Credentials::from(response)));
                self.queries.clear();
                let user = self.store.select(|state| state.auth.user().cloned());
                info!(user_id = user.as_ref().map(|user| user.id), "signed in");
                user.ok_or_else(|| ApiError::network("Session was not established"))
            }
            Err(err) => {
                warn!(status = ?err.status(), error = %err, "sign-in failed");
                self.dispatch(AuthAction::SetError(Some(err.message().to_string())));
                Err(err)
            }
        }
    }

    /// Ends the session locally. A failing server logout is logged and
    /// otherwise ignored.
    pub async fn logout(&self) {
        if let Err(err) = self.api.logout().await {
            warn!(error = %err, "server logout failed; clearing local session anyway");
        }
        self.clear_session();
    }

    /// Signs out locally. The store drops every user-scoped slice along
    /// with the session.
    fn clear_session(&self) {
        self.api.set_token(None);
        self.dispatch(AuthAction::Logout);
        self.queries.clear();
    }

    /// Fetches the profile and merges it into the session user.
    ///
    /// An expired token (401) ends the session.
    ///
    /// # Errors
    /// Returns the API error, which is also recorded in the auth slice.
    pub async fn load_profile(&self) -> Result<SessionUser, ApiError> {
        self.dispatch(AuthAction::SetLoading(true));
        match self.api.profile().await {
            Ok(profile) => {
                self.dispatch(AuthAction::ProfileLoaded(profile.clone()));
                self.dispatch(AuthAction::SetLoading(false));
                Ok(self
                    .store
                    .select(|state| state.auth.user().cloned())
                    .unwrap_or(profile))
            }
            Err(err) => {
                if err.is_unauthorized() {
                    warn!("session token rejected; signing out");
                    self.clear_session();
                }
                self.dispatch(AuthAction::SetError(Some(err.message().to_string())));
                Err(err)
            }
        }
    }

    /// Loads the profile only when signed in with an incomplete user record.
    ///
    /// # Errors
    /// Same as [`AuthHook::load_profile`].
    pub async fn ensure_profile(&self) -> Result<Option<SessionUser>, ApiError> {
        let needed = self.store.select(|state| {
            state.auth.is_authenticated()
                && state.auth.user().is_none_or(SessionUser::is_incomplete)
        });
        if !needed {
            debug!("profile already loaded");
            return Ok(self.store.select(|state| state.auth.user().cloned()));
        }
        self.load_profile().await.map(Some)
    }

    fn dispatch(&self, action: AuthAction) {
        self.store.dispatch(Action::Auth(action));
    }
}
