//! The hosted auth + data service, seen through one object-safe trait.
//!
//! Pages never talk HTTP themselves; they hold an `Arc<dyn Backend>` and spawn
//! its futures on the tokio runtime.

use crate::error::BackendResult;
use crate::models::{Application, Project, ProjectType};
use crate::profile::{NewProfile, ProfileChanges, ProfileRow};
use crate::session::{AuthSession, AuthUser, UserAttributes, UserMetadata};
use async_trait::async_trait;
use serde::Serialize;

#[cfg(test)]
pub mod fake;
pub mod rows;
pub mod supabase;

/// Result of `signUp`: GoTrue only returns a session when e-mail
/// confirmation is disabled for the project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpResponse {
    pub user: AuthUser,
    pub session: Option<AuthSession>,
}

/// An application joined with the applicant's profile, for organizations.
#[derive(Debug, Clone, PartialEq)]
pub struct Applicant {
    pub application: Application,
    pub student_name: String,
    pub student_email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewProject {
    pub title: String,
    pub description: String,
    pub organization: String,
    pub duration: String,
    #[serde(rename = "type")]
    pub project_type: ProjectType,
    pub skills: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mentor: Option<String>,
}

#[async_trait]
pub trait Backend: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> BackendResult<AuthSession>;

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: &UserMetadata,
    ) -> BackendResult<SignUpResponse>;

    async fn sign_out(&self, session: &AuthSession) -> BackendResult<()>;

    /// `getSession`: trades a stored refresh token for a live session.
    async fn refresh_session(&self, refresh_token: &str) -> BackendResult<AuthSession>;

    async fn update_user(
        &self,
        session: &AuthSession,
        attributes: &UserAttributes,
    ) -> BackendResult<AuthUser>;

    async fn fetch_profile(&self, session: &AuthSession) -> BackendResult<Option<ProfileRow>>;

    async fn insert_profile(
        &self,
        session: Option<&AuthSession>,
        profile: &NewProfile,
    ) -> BackendResult<()>;

    async fn update_profile(
        &self,
        session: &AuthSession,
        changes: &ProfileChanges,
    ) -> BackendResult<()>;

    async fn list_projects(
        &self,
        session: Option<&AuthSession>,
        limit: Option<usize>,
    ) -> BackendResult<Vec<Project>>;

    async fn fetch_project(
        &self,
        session: Option<&AuthSession>,
        id: &str,
    ) -> BackendResult<Option<Project>>;

    async fn insert_project(
        &self,
        session: &AuthSession,
        project: &NewProject,
    ) -> BackendResult<Project>;

    /// Applications submitted by the signed-in student.
    async fn list_applications(
        &self,
        session: &AuthSession,
        limit: Option<usize>,
    ) -> BackendResult<Vec<Application>>;

    async fn list_applicants(
        &self,
        session: &AuthSession,
        limit: Option<usize>,
    ) -> BackendResult<Vec<Applicant>>;

    async fn insert_application(&self, session: &AuthSession, project_id: &str)
        -> BackendResult<()>;
}
