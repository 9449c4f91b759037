//! Session slice.
//!
//! The only slice that touches durable storage: every session mutation is
//! mirrored to the `token` and `user` keys before the reducer returns.

use serde::Serialize;
use shared::models::{EntityId, LoginResponse, Role, SessionUser, UserPatch};
use strum::AsRefStr;
use tracing::warn;

use crate::storage::{DurableStorage, TOKEN_KEY, USER_KEY};

/// Credentials issued by a successful login or registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub token: String,
    pub role: Role,
    pub email: String,
    pub avatar: Option<String>,
    pub user_id: EntityId,
}

impl From<LoginResponse> for Credentials {
    fn from(response: LoginResponse) -> Self {
        Self {
            token: response.token,
            role: response.role,
            email: response.email,
            avatar: response.avatar,
            user_id: response.id_user,
        }
    }
}

/// Session mutations.
#[derive(Debug, Clone, PartialEq, Eq, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum AuthAction {
    SetCredentials(Credentials),
    Logout,
    /// Merges into the current user; ignored without one.
    UpdateUser(UserPatch),
    /// Installs a fetched profile; ignored without a token.
    ProfileLoaded(SessionUser),
    SetLoading(bool),
    SetError(Option<String>),
}

/// Current session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuthState {
    token: Option<String>,
    user: Option<SessionUser>,
    loading: bool,
    error: Option<String>,
}

impl AuthState {
    /// Rebuilds the session from storage.
    ///
    /// Without a token the stored user is ignored. With one, the stored user
    /// is used as-is even when incomplete; an unreadable record leaves the
    /// user empty until the profile is fetched.
    pub fn rehydrate(storage: &dyn DurableStorage) -> Self {
        let Some(token) = storage.get(TOKEN_KEY).filter(|token| !token.is_empty()) else {
            return Self::default();
        };

        let user = storage
            .get(USER_KEY)
            .and_then(|raw| match serde_json::from_str::<SessionUser>(&raw) {
                Ok(user) => Some(user),
                Err(err) => {
                    warn!(error = %err, "ignoring unreadable stored user");
                    None
                }
            });

        Self {
            token: Some(token),
            user,
            ..Self::default()
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|user| user.role)
    }

    /// True exactly when a token is held.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Applies one action and mirrors the session to `storage`.
    pub fn reduce(&mut self, action: AuthAction, storage: &dyn DurableStorage) {
        match action {
            AuthAction::SetCredentials(credentials) => {
                let user = SessionUser::minimal(
                    credentials.user_id,
                    credentials.email,
                    credentials.role,
                    credentials.avatar,
                );
                self.token = Some(credentials.token);
                self.user = Some(user);
                self.error = None;
                self.loading = false;
                self.persist_token(storage);
                self.persist_user(storage);
            }
            AuthAction::Logout => {
                *self = Self::default();
                for key in [TOKEN_KEY, USER_KEY] {
                    if let Err(err) = storage.remove(key) {
                        warn!(key, error = %err, "failed to clear stored session");
                    }
                }
            }
            AuthAction::UpdateUser(patch) => {
                if let Some(user) = self.user.as_mut() {
                    user.merge(patch);
                    self.persist_user(storage);
                }
            }
            AuthAction::ProfileLoaded(profile) => {
                if self.token.is_none() {
                    return;
                }
                match self.user.as_mut() {
                    Some(user) => {
                        user.id = profile.id;
                        user.merge(profile.into());
                    }
                    None => self.user = Some(profile),
                }
                self.persist_user(storage);
            }
            AuthAction::SetLoading(loading) => self.loading = loading,
            AuthAction::SetError(error) => {
                if error.is_some() {
                    self.loading = false;
                }
                self.error = error;
            }
        }
    }

    fn persist_token(&self, storage: &dyn DurableStorage) {
        if let Some(token) = &self.token {
            if let Err(err) = storage.set(TOKEN_KEY, token) {
                warn!(error = %err, "failed to persist session token");
            }
        }
    }

    fn persist_user(&self, storage: &dyn DurableStorage) {
        let Some(user) = &self.user else {
            return;
        };
        match serde_json::to_string(user) {
            Ok(raw) => {
                if let Err(err) = storage.set(USER_KEY, &raw) {
                    warn!(error = %err, "failed to persist session user");
                }
            }
            Err(err) => warn!(error = %err, "failed to serialize session user"),
        }
    }
}
