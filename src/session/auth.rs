//! Sign-in, sign-up, session restore and sign-out flows. Each returns the
//! next `AuthState` ingredients; the app applies them on the UI thread.

use crate::backend::Backend;
use crate::error::{BackendError, BackendResult};
use crate::models::Role;
use crate::profile::NewProfile;
use crate::session::{store, AuthSession, StoredSession, UserMetadata};
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpOutcome {
    SignedIn { session: AuthSession, role: Role },
    /// The account exists but the e-mail must be confirmed before signing in.
    ConfirmationRequired { email: String },
}

/// Role from the `profiles` row, else from user metadata, else unknown.
pub async fn resolve_role(backend: &dyn Backend, session: &AuthSession) -> Option<Role> {
    match backend.fetch_profile(session).await {
        Ok(Some(row)) => row
            .role
            .as_deref()
            .and_then(Role::parse)
            .or_else(|| session.user.metadata.role()),
        Ok(None) => session.user.metadata.role(),
        Err(err) => {
            warn!(error = %err, user_id = %session.user.id, "failed to fetch user role");
            session.user.metadata.role()
        }
    }
}

fn remember(session_dir: &Path, session: &AuthSession) {
    if let Err(err) = store::save(session_dir, &StoredSession::from_session(session)) {
        warn!(error = %err, "failed to persist auth session");
    }
}

pub async fn sign_in(
    backend: &dyn Backend,
    session_dir: &Path,
    email: &str,
    password: &str,
) -> BackendResult<(AuthSession, Option<Role>)> {
    let session = backend.sign_in(email.trim(), password).await?;
    let role = resolve_role(backend, &session).await;
    remember(session_dir, &session);
    info!(user_id = %session.user.id, role = ?role, "signed in");
    Ok((session, role))
}

pub async fn sign_up(
    backend: &dyn Backend,
    session_dir: &Path,
    email: &str,
    password: &str,
    role: Role,
) -> BackendResult<SignUpOutcome> {
    let email = email.trim();
    let metadata = UserMetadata {
        role: Some(role.as_str().to_string()),
        ..UserMetadata::default()
    };
    let response = backend.sign_up(email, password, &metadata).await?;

    let profile = NewProfile {
        id: response.user.id.clone(),
        email: email.to_string(),
        role,
        created_at: chrono::Utc::now().to_rfc3339(),
    };
    backend
        .insert_profile(response.session.as_ref(), &profile)
        .await?;

    match response.session {
        Some(session) => {
            remember(session_dir, &session);
            info!(user_id = %session.user.id, "signed up and signed in");
            Ok(SignUpOutcome::SignedIn { session, role })
        }
        None => {
            info!(user_id = %response.user.id, "signed up, awaiting e-mail confirmation");
            Ok(SignUpOutcome::ConfirmationRequired {
                email: email.to_string(),
            })
        }
    }
}

/// `getSession` at startup. Any failure just means "signed out".
pub async fn restore(
    backend: &dyn Backend,
    session_dir: &Path,
) -> Option<(AuthSession, Option<Role>)> {
    let (stored, warning) = store::load(session_dir);
    if let Some(warning) = warning {
        warn!(warning = %warning, "ignoring stored session");
    }
    let stored = stored?;

    match backend.refresh_session(&stored.refresh_token).await {
        Ok(session) => {
            let role = resolve_role(backend, &session).await;
            remember(session_dir, &session);
            info!(user_id = %session.user.id, "session restored");
            Some((session, role))
        }
        Err(err) => {
            warn!(error = %err, "stored session could not be refreshed");
            if let Err(err) = store::clear(session_dir) {
                warn!(error = %err, "failed to clear stale session");
            }
            None
        }
    }
}

/// Swaps the access token before it expires and remembers the new refresh
/// token. A rejected refresh token also forgets the stored session.
pub async fn refresh(
    backend: &dyn Backend,
    session_dir: &Path,
    session: &AuthSession,
) -> BackendResult<AuthSession> {
    match backend.refresh_session(&session.refresh_token).await {
        Ok(fresh) => {
            remember(session_dir, &fresh);
            info!(user_id = %fresh.user.id, "access token refreshed");
            Ok(fresh)
        }
        Err(err) => {
            warn!(error = %err, user_id = %session.user.id, "access token refresh failed");
            if matches!(err, BackendError::Auth(_)) {
                if let Err(err) = store::clear(session_dir) {
                    warn!(error = %err, "failed to clear rejected session");
                }
            }
            Err(err)
        }
    }
}

/// Always forgets the local session, even when revoking it remotely fails.
pub async fn sign_out(
    backend: &dyn Backend,
    session_dir: &Path,
    session: &AuthSession,
) -> BackendResult<()> {
    let remote = backend.sign_out(session).await;
    if let Err(err) = store::clear(session_dir) {
        warn!(error = %err, "failed to clear stored session");
    }
    remote
}
