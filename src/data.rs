//! Fallback-aware data access shared by every page: ask the backend, and when
//! there is no session, an error, or simply nothing there yet, hand back the
//! built-in sample instead so the page stays usable.

use crate::backend::{Applicant, Backend};
use crate::error::BackendResult;
use crate::models::{Application, Conversation, Project};
use crate::samples;
use crate::session::AuthSession;
use std::future::Future;
use tracing::{debug, warn};

pub const DASHBOARD_PROJECT_LIMIT: usize = 3;
pub const DASHBOARD_APPLICATION_LIMIT: usize = 2;
pub const DASHBOARD_APPLICANT_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// The query needs a signed-in user or a table that does not exist yet.
    NotConnected,
    Empty,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T> {
    Live(T),
    Fallback { data: T, reason: FallbackReason },
}

impl<T> Fetched<T> {
    pub fn data(&self) -> &T {
        match self {
            Self::Live(data) | Self::Fallback { data, .. } => data,
        }
    }

    pub fn data_mut(&mut self) -> &mut T {
        match self {
            Self::Live(data) | Self::Fallback { data, .. } => data,
        }
    }

    pub fn into_data(self) -> T {
        match self {
            Self::Live(data) | Self::Fallback { data, .. } => data,
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, Self::Live(_))
    }

    pub fn reason(&self) -> Option<&FallbackReason> {
        match self {
            Self::Live(_) => None,
            Self::Fallback { reason, .. } => Some(reason),
        }
    }
}

/// Anything a query can come back "with nothing in it".
pub trait Emptiness {
    fn is_empty_result(&self) -> bool;
}

impl<T> Emptiness for Vec<T> {
    fn is_empty_result(&self) -> bool {
        self.is_empty()
    }
}

impl<T> Emptiness for Option<T> {
    fn is_empty_result(&self) -> bool {
        self.is_none()
    }
}

pub async fn fetch_or_sample<T, F>(
    what: &'static str,
    query: Option<F>,
    sample: impl FnOnce() -> T,
) -> Fetched<T>
where
    T: Emptiness,
    F: Future<Output = BackendResult<T>>,
{
    let Some(query) = query else {
        debug!(what, "no live source, showing sample data");
        return Fetched::Fallback {
            data: sample(),
            reason: FallbackReason::NotConnected,
        };
    };

    match query.await {
        Ok(data) if !data.is_empty_result() => Fetched::Live(data),
        Ok(_) => {
            debug!(what, "backend returned nothing, showing sample data");
            Fetched::Fallback {
                data: sample(),
                reason: FallbackReason::Empty,
            }
        }
        Err(err) => {
            warn!(what, error = %err, "fetch failed, showing sample data");
            Fetched::Fallback {
                data: sample(),
                reason: FallbackReason::Failed(err.to_string()),
            }
        }
    }
}

pub async fn load_projects(
    backend: &dyn Backend,
    session: Option<&AuthSession>,
    limit: Option<usize>,
) -> Fetched<Vec<Project>> {
    fetch_or_sample(
        "projects",
        Some(backend.list_projects(session, limit)),
        || {
            let mut projects = samples::projects();
            if let Some(limit) = limit {
                projects.truncate(limit);
            }
            projects
        },
    )
    .await
}

pub async fn load_project(
    backend: &dyn Backend,
    session: Option<&AuthSession>,
    id: &str,
) -> Fetched<Option<Project>> {
    fetch_or_sample(
        "project",
        Some(backend.fetch_project(session, id)),
        || samples::project(id),
    )
    .await
}

/// Applications are per student, so without a session there is nothing live to ask.
pub async fn load_applications(
    backend: &dyn Backend,
    session: Option<&AuthSession>,
    limit: Option<usize>,
) -> Fetched<Vec<Application>> {
    let query = session.map(|session| backend.list_applications(session, limit));
    fetch_or_sample("applications", query, || {
        let mut applications = samples::applications();
        if let Some(limit) = limit {
            applications.truncate(limit);
        }
        applications
    })
    .await
}

/// Project ids the signed-in user already applied to. A failed lookup leaves
/// the set empty so apply still works.
pub async fn load_applied_project_ids(backend: &dyn Backend, session: &AuthSession) -> Vec<String> {
    match backend.list_applications(session, None).await {
        Ok(applications) => applications
            .into_iter()
            .filter_map(|application| application.project_id)
            .collect(),
        Err(err) => {
            warn!(error = %err, "could not load existing applications");
            Vec::new()
        }
    }
}

pub async fn load_applicants(
    backend: &dyn Backend,
    session: Option<&AuthSession>,
) -> Fetched<Vec<Applicant>> {
    let query = session.map(|session| backend.list_applicants(session, Some(DASHBOARD_APPLICANT_LIMIT)));
    fetch_or_sample("applicants", query, Vec::new).await
}

/// There is no messages table yet; conversations always come from the sample inbox.
pub async fn load_conversations() -> Fetched<Vec<Conversation>> {
    fetch_or_sample(
        "conversations",
        None::<std::future::Ready<BackendResult<Vec<Conversation>>>>,
        samples::conversations,
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::fake::{session_for, FakeBackend, FakeCall};
    use crate::error::BackendError;

    #[tokio::test]
    async fn live_rows_are_used_when_present() {
        let backend = FakeBackend::default();
        let mut live = samples::projects();
        live.truncate(1);
        live[0].title = "Live project".to_string();
        backend.set_projects(Ok(live.clone()));

        let fetched = load_projects(&backend, None, None).await;
        assert!(fetched.is_live());
        assert_eq!(fetched.data(), &live);
    }

    #[tokio::test]
    async fn empty_result_falls_back_to_samples() {
        let backend = FakeBackend::default();
        backend.set_projects(Ok(Vec::new()));

        let fetched = load_projects(&backend, None, Some(DASHBOARD_PROJECT_LIMIT)).await;
        assert_eq!(fetched.reason(), Some(&FallbackReason::Empty));
        assert_eq!(fetched.data().len(), DASHBOARD_PROJECT_LIMIT);
    }

    #[tokio::test]
    async fn errors_fall_back_to_samples() {
        let backend = FakeBackend::default();
        backend.set_projects(Err(BackendError::Http("connection refused".to_string())));

        let fetched = load_projects(&backend, None, None).await;
        assert_eq!(
            fetched.reason(),
            Some(&FallbackReason::Failed(
                "Network error: connection refused".to_string()
            ))
        );
        assert_eq!(fetched.data(), &samples::projects());
    }

    #[tokio::test]
    async fn applications_without_session_skip_the_backend() {
        let backend = FakeBackend::default();
        let fetched = load_applications(&backend, None, None).await;

        assert_eq!(fetched.reason(), Some(&FallbackReason::NotConnected));
        assert_eq!(fetched.data().len(), 6);
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn applications_with_session_and_no_rows_use_samples() {
        let backend = FakeBackend::default();
        let session = session_for("user-1", "ada@example.com");
        let fetched = load_applications(&backend, Some(&session), Some(DASHBOARD_APPLICATION_LIMIT)).await;

        assert_eq!(fetched.reason(), Some(&FallbackReason::Empty));
        assert_eq!(fetched.data().len(), DASHBOARD_APPLICATION_LIMIT);
    }

    #[tokio::test]
    async fn missing_project_detail_falls_back_by_id() {
        let backend = FakeBackend::default();
        let fetched = load_project(&backend, None, "6").await;

        assert!(!fetched.is_live());
        assert_eq!(
            fetched.data().as_ref().map(|project| project.title.as_str()),
            Some("Website Redesign for Mental Health Awareness")
        );
        assert!(backend.calls().contains(&FakeCall::ListProjects));
    }

    #[tokio::test]
    async fn conversations_come_from_the_sample_inbox() {
        let fetched = load_conversations().await;
        assert_eq!(fetched.reason(), Some(&FallbackReason::NotConnected));
        assert_eq!(fetched.data().len(), 5);
    }
}
