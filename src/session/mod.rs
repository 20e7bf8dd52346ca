use crate::models::Role;
use serde::{Deserialize, Serialize};

pub mod auth;
pub mod store;

pub const SCHEMA_VERSION: u32 = 1;

/// Access tokens are refreshed this long before they expire.
pub const REFRESH_MARGIN_SECS: i64 = 60;

/// Free-form attributes carried on the auth user. Used as the profile
/// fallback when the `profiles` row is missing columns.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub university: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl UserMetadata {
    pub fn role(&self) -> Option<Role> {
        self.role.as_deref().and_then(Role::parse)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, rename = "user_metadata")]
    pub metadata: UserMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix seconds
    pub expires_at: Option<i64>,
    pub user: AuthUser,
}

impl AuthSession {
    /// Seconds until the access token should be swapped, or `None` when the
    /// server gave no expiry.
    pub fn refresh_in(&self, now: i64) -> Option<i64> {
        self.expires_at
            .map(|expires_at| (expires_at - REFRESH_MARGIN_SECS - now).max(0))
    }

    pub fn refresh_due(&self, now: i64) -> bool {
        self.refresh_in(now) == Some(0)
    }
}

/// Attributes accepted by `updateUser`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct UserAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<UserMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    #[default]
    Unauthenticated,
    Loading,
    Authenticated {
        session: AuthSession,
        role: Option<Role>,
    },
}

impl AuthState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    pub fn session(&self) -> Option<&AuthSession> {
        match self {
            Self::Authenticated { session, .. } => Some(session),
            _ => None,
        }
    }

    pub fn user(&self) -> Option<&AuthUser> {
        self.session().map(|session| &session.user)
    }

    pub fn role(&self) -> Option<Role> {
        match self {
            Self::Authenticated { role, .. } => *role,
            _ => None,
        }
    }

    pub fn is_organization(&self) -> bool {
        self.role() == Some(Role::Organization)
    }
}

/// What survives a restart: only the refresh token and who it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub schema_version: u32,
    pub refresh_token: String,
    pub user_id: String,
    #[serde(default)]
    pub email: Option<String>,
    pub saved_at: String,
}

impl StoredSession {
    pub fn from_session(session: &AuthSession) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            refresh_token: session.refresh_token.clone(),
            user_id: session.user.id.clone(),
            email: session.user.email.clone(),
            saved_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
