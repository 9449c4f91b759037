use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::EntityId;

/// Account role, as issued by the API at login.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[default]
    Candidate,
    Hr,
    University,
    Admin,
}

impl Role {
    /// Return the canonical string representation used on the wire.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Candidate => "CANDIDATE",
            Self::Hr => "HR",
            Self::University => "UNIVERSITY",
            Self::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = &'static str;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_uppercase().as_str() {
            "CANDIDATE" => Ok(Self::Candidate),
            "HR" => Ok(Self::Hr),
            "UNIVERSITY" => Ok(Self::University),
            "ADMIN" => Ok(Self::Admin),
            _ => Err("unknown role"),
        }
    }
}

/// The signed-in user's record as kept in the session.
///
/// Right after login only `id`, `email`, `role` and `avatar` are known; the
/// remaining profile fields stay empty until the profile is fetched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionUser {
    pub id: EntityId,
    pub email: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub avatar: Option<String>,
    pub phone: Option<String>,
}

impl SessionUser {
    /// Minimal record built from login credentials.
    pub fn minimal(id: EntityId, email: impl Into<String>, role: Role, avatar: Option<String>) -> Self {
        Self {
            id,
            email: email.into(),
            role,
            avatar,
            ..Self::default()
        }
    }

    /// Applies every field present in `patch`.
    pub fn merge(&mut self, patch: UserPatch) {
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
        if let Some(first_name) = patch.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = patch.last_name {
            self.last_name = last_name;
        }
        if let Some(avatar) = patch.avatar {
            self.avatar = avatar;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
    }

    /// Whether the lazily fetched profile fields are still missing.
    #[must_use]
    pub fn is_incomplete(&self) -> bool {
        self.first_name.is_empty() && self.last_name.is_empty()
    }
}

/// Partial update for [`SessionUser`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPatch {
    pub email: Option<String>,
    pub role: Option<Role>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar: Option<Option<String>>,
    pub phone: Option<Option<String>>,
}

impl From<SessionUser> for UserPatch {
    fn from(user: SessionUser) -> Self {
        Self {
            email: Some(user.email),
            role: Some(user.role),
            first_name: Some(user.first_name),
            last_name: Some(user.last_name),
            avatar: Some(user.avatar),
            phone: Some(user.phone),
        }
    }
}

/// Email/password login body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Account registration body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
}

/// Credentials returned by login and registration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub role: Role,
    pub email: String,
    #[serde(default)]
    pub avatar: Option<String>,
    pub id_user: EntityId,
}
