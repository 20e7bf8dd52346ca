//! In-memory `Backend` for tests. Records calls and lets a test script failures.

use super::{Applicant, Backend, NewProject, SignUpResponse};
use crate::error::{BackendError, BackendResult};
use crate::models::{Application, ApplicationStatus, Project, ProjectType};
use crate::profile::{NewProfile, ProfileChanges, ProfileRow};
use crate::session::{AuthSession, AuthUser, UserAttributes, UserMetadata};
use async_trait::async_trait;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub enum FakeCall {
    SignIn(String),
    SignUp(String),
    SignOut,
    Refresh(String),
    UpdateUser(UserAttributes),
    FetchProfile,
    InsertProfile(NewProfile),
    UpdateProfile(ProfileChanges),
    ListProjects,
    InsertApplication(String),
}

#[derive(Default)]
struct FakeState {
    calls: Vec<FakeCall>,
    sign_in: Option<BackendError>,
    update_profile: Option<BackendError>,
    update_user: Option<BackendError>,
    fetch_profile: Option<BackendResult<Option<ProfileRow>>>,
    projects: Option<BackendResult<Vec<Project>>>,
    applied: Vec<String>,
    sign_up_session: bool,
}

#[derive(Default)]
pub struct FakeBackend {
    state: Mutex<FakeState>,
}

pub fn session_for(user_id: &str, email: &str) -> AuthSession {
    AuthSession {
        access_token: format!("access-{user_id}"),
        refresh_token: format!("refresh-{user_id}"),
        expires_at: None,
        user: AuthUser {
            id: user_id.to_string(),
            email: Some(email.to_string()),
            metadata: UserMetadata::default(),
        },
    }
}

impl FakeBackend {
    fn with_state<R>(&self, f: impl FnOnce(&mut FakeState) -> R) -> R {
        let mut guard = self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard)
    }

    pub fn calls(&self) -> Vec<FakeCall> {
        self.with_state(|state| state.calls.clone())
    }

    pub fn user_updates(&self) -> Vec<UserAttributes> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                FakeCall::UpdateUser(attributes) => Some(attributes),
                _ => None,
            })
            .collect()
    }

    pub fn fail_sign_in(&self, error: BackendError) {
        self.with_state(|state| state.sign_in = Some(error));
    }

    pub fn fail_update_profile(&self, error: BackendError) {
        self.with_state(|state| state.update_profile = Some(error));
    }

    pub fn fail_update_user(&self, error: BackendError) {
        self.with_state(|state| state.update_user = Some(error));
    }

    pub fn set_profile(&self, result: BackendResult<Option<ProfileRow>>) {
        self.with_state(|state| state.fetch_profile = Some(result));
    }

    pub fn set_projects(&self, result: BackendResult<Vec<Project>>) {
        self.with_state(|state| state.projects = Some(result));
    }

    pub fn confirm_sign_ups_immediately(&self) {
        self.with_state(|state| state.sign_up_session = true);
    }

    fn record(&self, call: FakeCall) {
        self.with_state(|state| state.calls.push(call));
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn sign_in(&self, email: &str, _password: &str) -> BackendResult<AuthSession> {
        self.record(FakeCall::SignIn(email.to_string()));
        match self.with_state(|state| state.sign_in.clone()) {
            Some(error) => Err(error),
            None => Ok(session_for("user-1", email)),
        }
    }

    async fn sign_up(
        &self,
        email: &str,
        _password: &str,
        metadata: &UserMetadata,
    ) -> BackendResult<SignUpResponse> {
        self.record(FakeCall::SignUp(email.to_string()));
        let mut session = session_for("user-new", email);
        session.user.metadata = metadata.clone();
        let immediate = self.with_state(|state| state.sign_up_session);
        Ok(SignUpResponse {
            user: session.user.clone(),
            session: immediate.then_some(session),
        })
    }

    async fn sign_out(&self, _session: &AuthSession) -> BackendResult<()> {
        self.record(FakeCall::SignOut);
        Ok(())
    }

    async fn refresh_session(&self, refresh_token: &str) -> BackendResult<AuthSession> {
        self.record(FakeCall::Refresh(refresh_token.to_string()));
        if refresh_token == "expired" {
            return Err(BackendError::Auth("Invalid Refresh Token".to_string()));
        }
        Ok(session_for("user-1", "ada@example.com"))
    }

    async fn update_user(
        &self,
        session: &AuthSession,
        attributes: &UserAttributes,
    ) -> BackendResult<AuthUser> {
        self.record(FakeCall::UpdateUser(attributes.clone()));
        if let Some(error) = self.with_state(|state| state.update_user.clone()) {
            return Err(error);
        }
        let mut user = session.user.clone();
        if let Some(data) = &attributes.data {
            user.metadata = data.clone();
        }
        Ok(user)
    }

    async fn fetch_profile(&self, _session: &AuthSession) -> BackendResult<Option<ProfileRow>> {
        self.record(FakeCall::FetchProfile);
        self.with_state(|state| state.fetch_profile.clone())
            .unwrap_or(Ok(None))
    }

    async fn insert_profile(
        &self,
        _session: Option<&AuthSession>,
        profile: &NewProfile,
    ) -> BackendResult<()> {
        self.record(FakeCall::InsertProfile(profile.clone()));
        Ok(())
    }

    async fn update_profile(
        &self,
        _session: &AuthSession,
        changes: &ProfileChanges,
    ) -> BackendResult<()> {
        self.record(FakeCall::UpdateProfile(changes.clone()));
        match self.with_state(|state| state.update_profile.clone()) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn list_projects(
        &self,
        _session: Option<&AuthSession>,
        limit: Option<usize>,
    ) -> BackendResult<Vec<Project>> {
        self.record(FakeCall::ListProjects);
        let projects = self
            .with_state(|state| state.projects.clone())
            .unwrap_or(Ok(Vec::new()))?;
        Ok(match limit {
            Some(limit) => projects.into_iter().take(limit).collect(),
            None => projects,
        })
    }

    async fn fetch_project(
        &self,
        session: Option<&AuthSession>,
        id: &str,
    ) -> BackendResult<Option<Project>> {
        let projects = self.list_projects(session, None).await?;
        Ok(projects.into_iter().find(|project| project.id == id))
    }

    async fn insert_project(
        &self,
        _session: &AuthSession,
        project: &NewProject,
    ) -> BackendResult<Project> {
        Ok(Project {
            id: "new-project".to_string(),
            title: project.title.clone(),
            description: project.description.clone(),
            organization: project.organization.clone(),
            duration: project.duration.clone(),
            project_type: project.project_type,
            skills: project.skills.clone(),
            mentor: project.mentor.clone(),
            applications: 0,
            posted_date: "Just now".to_string(),
        })
    }

    async fn list_applications(
        &self,
        _session: &AuthSession,
        _limit: Option<usize>,
    ) -> BackendResult<Vec<Application>> {
        let applied = self.with_state(|state| state.applied.clone());
        Ok(applied
            .into_iter()
            .enumerate()
            .map(|(index, project_id)| Application {
                id: format!("application-{index}"),
                project: format!("Project {project_id}"),
                project_id: Some(project_id),
                organization: String::new(),
                status: ApplicationStatus::UnderReview,
                applied_date: "2026-01-01".to_string(),
                skills: Vec::new(),
                project_type: ProjectType::Remote,
                duration: String::new(),
                description: String::new(),
                mentor: None,
            })
            .collect())
    }

    async fn list_applicants(
        &self,
        _session: &AuthSession,
        _limit: Option<usize>,
    ) -> BackendResult<Vec<Applicant>> {
        Ok(Vec::new())
    }

    async fn insert_application(
        &self,
        _session: &AuthSession,
        project_id: &str,
    ) -> BackendResult<()> {
        self.with_state(|state| {
            state.calls.push(FakeCall::InsertApplication(project_id.to_string()));
            state.applied.push(project_id.to_string());
        });
        Ok(())
    }
}
