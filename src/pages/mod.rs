//! One state struct per routed page. The app keeps exactly one [`Page`]
//! mounted; replacing it drops the page's loader and executors, which aborts
//! everything they still had running.

pub mod applications;
pub mod auth;
pub mod dashboard;
pub mod landing;
pub mod leaderboard;
pub mod mentors;
pub mod messages;
pub mod org_dashboard;
pub mod project_detail;
pub mod projects;
pub mod settings;
pub mod widgets;

use crate::action::{ActionExecutor, DelayedTask, ProjectActions, RemoteApply};
use crate::backend::Backend;
use crate::data;
use crate::config::AppConfig;
use crate::event::{ActionEvent, AppEvent, EventSender, OwnerToken, PagePayload};
use crate::router::Route;
use crate::session::AuthState;
use crate::theme::Theme;
use eframe::egui;
use std::future::Future;
use std::sync::Arc;
use tokio::runtime::Handle;

/// Long-lived handles every page borrows to start work.
#[derive(Clone)]
pub struct Services {
    pub backend: Arc<dyn Backend>,
    pub config: AppConfig,
    pub runtime: Handle,
    pub events: EventSender,
}

impl Services {
    pub fn executor(&self, owner: OwnerToken) -> ActionExecutor {
        ActionExecutor::new(
            owner,
            self.runtime.clone(),
            self.events.clone(),
            self.config.request_timeout,
        )
    }

    /// Runs `load` and delivers its payload to `owner`.
    pub fn load<F>(&self, owner: OwnerToken, load: F) -> DelayedTask
    where
        F: Future<Output = PagePayload> + Send + 'static,
    {
        let events = self.events.clone();
        DelayedTask::spawn(&self.runtime, async move {
            let payload = load.await;
            events.send(AppEvent::Page { owner, payload });
        })
    }

    /// Project actions for `owner`. With a session, apply stays disabled until
    /// the user's existing applications arrive as [`PagePayload::AppliedProjects`].
    pub fn project_actions(&self, owner: OwnerToken, auth: &AuthState) -> ProjectActions {
        let actions = ProjectActions::new(self.executor(owner));
        let Some(session) = auth.session().cloned() else {
            return actions;
        };
        let backend = self.backend.clone();
        let task = self.load(owner, async move {
            PagePayload::AppliedProjects(
                data::load_applied_project_ids(backend.as_ref(), &session).await,
            )
        });
        actions.awaiting_applied(task)
    }

    /// Real application rows are only written for live projects and a signed-in user.
    pub fn remote_apply(&self, auth: &AuthState, live: bool) -> Option<RemoteApply> {
        if !live {
            return None;
        }
        auth.session().map(|session| RemoteApply {
            backend: self.backend.clone(),
            session: session.clone(),
        })
    }
}

/// Data a page is waiting for. Dropping a pending load aborts it.
pub enum Load<T> {
    /// Held only so that dropping the load aborts it.
    Pending(#[allow(dead_code)] DelayedTask),
    Ready(T),
}

impl<T> Load<T> {
    pub fn start<F>(services: &Services, owner: OwnerToken, load: F) -> Self
    where
        F: Future<Output = PagePayload> + Send + 'static,
    {
        Self::Pending(services.load(owner, load))
    }

    pub fn finish(&mut self, value: T) {
        *self = Self::Ready(value);
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Pending(_) => None,
            Self::Ready(value) => Some(value),
        }
    }

    pub fn ready_mut(&mut self) -> Option<&mut T> {
        match self {
            Self::Pending(_) => None,
            Self::Ready(value) => Some(value),
        }
    }
}

/// What a page sees while drawing one frame.
pub struct PageCtx<'a> {
    pub services: &'a Services,
    pub auth: &'a AuthState,
    pub theme: &'a Theme,
    navigate: Option<Route>,
}

impl<'a> PageCtx<'a> {
    pub fn new(services: &'a Services, auth: &'a AuthState, theme: &'a Theme) -> Self {
        Self {
            services,
            auth,
            theme,
            navigate: None,
        }
    }

    pub fn navigate(&mut self, route: Route) {
        self.navigate = Some(route);
    }

    pub fn take_navigation(&mut self) -> Option<Route> {
        self.navigate.take()
    }
}

pub enum Page {
    Landing(landing::LandingPage),
    Auth(auth::AuthPage),
    Dashboard(dashboard::StudentDashboardPage),
    OrgDashboard(org_dashboard::OrgDashboardPage),
    Projects(projects::ProjectsPage),
    ProjectDetail(project_detail::ProjectDetailPage),
    Applications(applications::ApplicationsPage),
    Messages(messages::MessagesPage),
    Mentors(mentors::MentorsPage),
    Mentor(mentors::MentorProfilePage),
    Leaderboard(leaderboard::LeaderboardPage),
    Settings(settings::SettingsPage),
}

impl Page {
    /// Builds fresh state for an already-resolved route and starts its loads.
    pub fn mount(route: &Route, services: &Services, auth: &AuthState) -> Self {
        match route {
            Route::Landing => Self::Landing(landing::LandingPage),
            Route::Login => Self::Auth(auth::AuthPage::login()),
            Route::Signup => Self::Auth(auth::AuthPage::sign_up()),
            Route::Dashboard => Self::Dashboard(dashboard::StudentDashboardPage::new(services, auth)),
            Route::OrgDashboard => {
                Self::OrgDashboard(org_dashboard::OrgDashboardPage::new(services, auth))
            }
            Route::Projects => Self::Projects(projects::ProjectsPage::new(services, auth)),
            Route::ProjectDetail(id) => {
                Self::ProjectDetail(project_detail::ProjectDetailPage::new(services, auth, id))
            }
            Route::Applications => {
                Self::Applications(applications::ApplicationsPage::new(services, auth))
            }
            Route::Messages => Self::Messages(messages::MessagesPage::new(services, auth)),
            Route::Mentors => Self::Mentors(mentors::MentorsPage::default()),
            Route::Mentor(id) => Self::Mentor(mentors::MentorProfilePage::new(*id)),
            Route::Leaderboard => Self::Leaderboard(leaderboard::LeaderboardPage::default()),
            Route::Settings => Self::Settings(settings::SettingsPage::new(services, auth)),
        }
    }

    /// Pages without async work have no owner and never receive events.
    pub fn owner(&self) -> Option<OwnerToken> {
        match self {
            Self::Dashboard(page) => Some(page.owner()),
            Self::OrgDashboard(page) => Some(page.owner()),
            Self::Projects(page) => Some(page.owner()),
            Self::ProjectDetail(page) => Some(page.owner()),
            Self::Applications(page) => Some(page.owner()),
            Self::Messages(page) => Some(page.owner()),
            Self::Settings(page) => Some(page.owner()),
            Self::Landing(_)
            | Self::Auth(_)
            | Self::Mentors(_)
            | Self::Mentor(_)
            | Self::Leaderboard(_) => None,
        }
    }

    pub fn on_payload(&mut self, payload: PagePayload) {
        match self {
            Self::Dashboard(page) => page.on_payload(payload),
            Self::OrgDashboard(page) => page.on_payload(payload),
            Self::Projects(page) => page.on_payload(payload),
            Self::ProjectDetail(page) => page.on_payload(payload),
            Self::Applications(page) => page.on_payload(payload),
            Self::Messages(page) => page.on_payload(payload),
            Self::Settings(page) => page.on_payload(payload),
            _ => {}
        }
    }

    pub fn on_action(&mut self, event: ActionEvent) {
        match self {
            Self::Projects(page) => page.on_action(event),
            Self::ProjectDetail(page) => page.on_action(event),
            Self::OrgDashboard(page) => page.on_action(event),
            Self::Settings(page) => page.on_action(event),
            _ => {}
        }
    }

    pub fn auth_page(&mut self) -> Option<&mut auth::AuthPage> {
        match self {
            Self::Auth(page) => Some(page),
            _ => None,
        }
    }

    /// Unread total once the inbox has loaded.
    pub fn unread(&self) -> Option<u32> {
        match self {
            Self::Messages(page) => page.total_unread(),
            _ => None,
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui, ctx: &mut PageCtx<'_>) {
        match self {
            Self::Landing(page) => page.show(ui, ctx),
            Self::Auth(page) => page.show(ui, ctx),
            Self::Dashboard(page) => page.show(ui, ctx),
            Self::OrgDashboard(page) => page.show(ui, ctx),
            Self::Projects(page) => page.show(ui, ctx),
            Self::ProjectDetail(page) => page.show(ui, ctx),
            Self::Applications(page) => page.show(ui, ctx),
            Self::Messages(page) => page.show(ui, ctx),
            Self::Mentors(page) => page.show(ui, ctx),
            Self::Mentor(page) => page.show(ui, ctx),
            Self::Leaderboard(page) => page.show(ui, ctx),
            Self::Settings(page) => page.show(ui, ctx),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::mpsc::{self, Receiver};

    pub(crate) fn services(backend: Arc<dyn Backend>) -> (Services, Receiver<AppEvent>) {
        let config = AppConfig::from_lookup(|key| match key {
            "SUPABASE_URL" => Some("https://example.supabase.co".to_string()),
            "SUPABASE_ANON_KEY" => Some("anon".to_string()),
            _ => None,
        })
        .expect("config should load");
        let (tx, rx) = mpsc::channel();
        let services = Services {
            backend,
            config,
            runtime: Handle::current(),
            events: EventSender::new(tx),
        };
        (services, rx)
    }
}
