use crate::action::{ActionIntent, ActionKind, ActionOutput, Generation};
use crate::backend::Applicant;
use crate::data::Fetched;
use crate::error::BackendResult;
use crate::models::{Application, Conversation, Project, Role};
use crate::profile::Profile;
use crate::session::auth::SignUpOutcome;
use crate::session::{AuthSession, AuthUser};
use eframe::egui;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, Arc, OnceLock};

/// Identifies one mounted page state. Results addressed to any other token
/// arrived after the page was left and are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OwnerToken(u64);

static NEXT_OWNER: AtomicU64 = AtomicU64::new(1);

impl OwnerToken {
    pub fn next() -> Self {
        Self(NEXT_OWNER.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Clone)]
pub enum AuthEvent {
    Restored(Option<(AuthSession, Option<Role>)>),
    SignedIn {
        session: AuthSession,
        role: Option<Role>,
    },
    SignedUp(SignUpOutcome),
    Failed(String),
    /// Result of swapping an expiring access token.
    Refreshed(BackendResult<AuthSession>),
    /// The server's copy of the user after a metadata write.
    UserUpdated(AuthUser),
}

#[derive(Debug, Clone)]
pub enum PagePayload {
    Projects(Fetched<Vec<Project>>),
    Project(Fetched<Option<Project>>),
    AppliedProjects(Vec<String>),
    Applications(Fetched<Vec<Application>>),
    StudentDashboard {
        projects: Fetched<Vec<Project>>,
        applications: Fetched<Vec<Application>>,
    },
    OrganizationDashboard {
        projects: Fetched<Vec<Project>>,
        applicants: Fetched<Vec<Applicant>>,
    },
    Conversations(Fetched<Vec<Conversation>>),
    Profile(Profile),
}

#[derive(Debug, Clone)]
pub enum ActionEvent {
    Settled {
        generation: Generation,
        intent: ActionIntent,
        outcome: BackendResult<ActionOutput>,
    },
    Expired {
        kind: ActionKind,
        generation: Generation,
    },
}

#[derive(Debug, Clone)]
pub enum AppEvent {
    Auth(AuthEvent),
    Page {
        owner: OwnerToken,
        payload: PagePayload,
    },
    Action {
        owner: OwnerToken,
        event: ActionEvent,
    },
}

/// Channel into the UI thread. Every send also wakes egui so the event is
/// drained on the next frame instead of the next input.
#[derive(Clone)]
pub struct EventSender {
    tx: mpsc::Sender<AppEvent>,
    repaint: Arc<OnceLock<egui::Context>>,
}

impl EventSender {
    pub fn new(tx: mpsc::Sender<AppEvent>) -> Self {
        Self {
            tx,
            repaint: Arc::new(OnceLock::new()),
        }
    }

    pub fn attach(&self, ctx: &egui::Context) {
        let _ = self.repaint.set(ctx.clone());
    }

    pub fn send(&self, event: AppEvent) {
        let _ = self.tx.send(event);
        if let Some(ctx) = self.repaint.get() {
            ctx.request_repaint();
        }
    }
}
