use crate::action::DelayedTask;
use crate::error::{BackendError, BackendResult, ConfigError};
use crate::event::{AppEvent, AuthEvent};
use crate::models::Role;
use crate::pages::{Page, PageCtx, Services};
use crate::router::{self, Resolved, Route};
use crate::session::auth::{self, SignUpOutcome};
use crate::session::{AuthSession, AuthState};
use crate::theme::Theme;
use eframe::egui::{self, RichText};
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Wait before retrying a refresh that failed for a reason other than a
/// rejected token.
const REFRESH_RETRY_SECS: i64 = 30;

enum Shell {
    Ready(Services),
    /// Configuration was unusable; nothing else is rendered.
    Blocked(ConfigError),
}

enum NavRequest {
    Go(Route),
    SignOut,
}

pub struct SkillBridgeApp {
    rx: Receiver<AppEvent>,
    shell: Shell,
    theme: Theme,
    auth: AuthState,
    requested: Route,
    shown: Option<Route>,
    page: Option<Page>,
    inbox_unread: Option<u32>,
    refreshing: Option<DelayedTask>,
    refresh_retry_at: Option<i64>,
}

impl SkillBridgeApp {
    /// Starts restoring the persisted session; every route shows the
    /// spinner until that settles.
    pub fn new(rx: Receiver<AppEvent>, services: Services) -> Self {
        let backend = services.backend.clone();
        let session_dir = services.config.session_dir.clone();
        let events = services.events.clone();
        services.runtime.spawn(async move {
            let restored = auth::restore(backend.as_ref(), &session_dir).await;
            events.send(AppEvent::Auth(AuthEvent::Restored(restored)));
        });

        Self {
            rx,
            shell: Shell::Ready(services),
            theme: Theme::default(),
            auth: AuthState::Loading,
            requested: Route::Landing,
            shown: None,
            page: None,
            inbox_unread: None,
            refreshing: None,
            refresh_retry_at: None,
        }
    }

    pub fn blocked(rx: Receiver<AppEvent>, error: ConfigError) -> Self {
        Self {
            rx,
            shell: Shell::Blocked(error),
            theme: Theme::default(),
            auth: AuthState::Unauthenticated,
            requested: Route::Landing,
            shown: None,
            page: None,
            inbox_unread: None,
            refreshing: None,
            refresh_retry_at: None,
        }
    }

    /// Hooks the event channel up to repaints and applies the theme.
    pub fn install(&self, ctx: &egui::Context) {
        if let Shell::Ready(services) = &self.shell {
            services.events.attach(ctx);
        }
        self.theme.apply_visuals(ctx);
    }

    fn navigate(&mut self, route: Route) {
        self.requested = route;
        self.remount();
    }

    /// Re-runs the guards and swaps the mounted page when the target changed.
    fn remount(&mut self) {
        let Shell::Ready(services) = &self.shell else {
            return;
        };
        match router::resolve(&self.requested, &self.auth) {
            Resolved::Pending => {
                self.page = None;
                self.shown = None;
            }
            Resolved::Show(route) => {
                if self.page.is_some() && self.shown.as_ref() == Some(&route) {
                    return;
                }
                info!(page = route.title(), "opening page");
                // Dropping the old page aborts its loads and timers.
                self.page = Some(Page::mount(&route, services, &self.auth));
                self.shown = Some(route);
            }
        }
    }

    fn sign_out(&mut self) {
        if let (Shell::Ready(services), Some(session)) = (&self.shell, self.auth.session()) {
            let backend = services.backend.clone();
            let session_dir = services.config.session_dir.clone();
            let session = session.clone();
            services.runtime.spawn(async move {
                if let Err(err) = auth::sign_out(backend.as_ref(), &session_dir, &session).await {
                    warn!(error = %err, "remote sign-out failed");
                }
            });
        }
        info!("signed out");
        self.refreshing = None;
        self.auth = AuthState::Unauthenticated;
        self.inbox_unread = None;
        self.navigate(Route::Landing);
    }

    /// Starts a token refresh once the access token is inside its expiry margin.
    fn keep_session_fresh(&mut self, now: i64) {
        let Shell::Ready(services) = &self.shell else {
            return;
        };
        let Some(session) = self.auth.session() else {
            return;
        };
        if self.refreshing.is_some() || !session.refresh_due(now) {
            return;
        }
        if self.refresh_retry_at.is_some_and(|retry_at| now < retry_at) {
            return;
        }

        debug!(user_id = %session.user.id, "refreshing access token");
        let backend = services.backend.clone();
        let session_dir = services.config.session_dir.clone();
        let events = services.events.clone();
        let session = session.clone();
        self.refreshing = Some(DelayedTask::spawn(&services.runtime, async move {
            let result = auth::refresh(backend.as_ref(), &session_dir, &session).await;
            events.send(AppEvent::Auth(AuthEvent::Refreshed(result)));
        }));
    }

    fn apply_refresh(&mut self, result: BackendResult<AuthSession>, now: i64) {
        self.refreshing = None;
        match result {
            Ok(fresh) => {
                self.refresh_retry_at = None;
                if let AuthState::Authenticated { session, .. } = &mut self.auth {
                    if session.user.id == fresh.user.id {
                        *session = fresh;
                    }
                }
            }
            Err(BackendError::Auth(message)) => {
                warn!(error = %message, "session is no longer valid, signing out");
                self.auth = AuthState::Unauthenticated;
                self.inbox_unread = None;
                self.remount();
            }
            Err(_) => {
                self.refresh_retry_at = Some(now + REFRESH_RETRY_SECS);
            }
        }
    }

    fn drain_events(&mut self) {
        loop {
            match self.rx.try_recv() {
                Ok(event) => self.apply_event(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    warn!("event channel disconnected");
                    break;
                }
            }
        }
    }

    fn apply_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Auth(event) => self.apply_auth(event),
            AppEvent::Page { owner, payload } => match self.page.as_mut() {
                Some(page) if page.owner() == Some(owner) => page.on_payload(payload),
                _ => debug!(?owner, "dropping load result for a page that is gone"),
            },
            AppEvent::Action { owner, event } => match self.page.as_mut() {
                Some(page) if page.owner() == Some(owner) => page.on_action(event),
                _ => debug!(?owner, "dropping action event for a page that is gone"),
            },
        }
    }

    fn signed_in(&mut self, session: AuthSession, role: Option<Role>) {
        self.auth = AuthState::Authenticated { session, role };
        self.navigate(Route::home_for(role));
    }

    fn apply_auth(&mut self, event: AuthEvent) {
        match event {
            AuthEvent::Restored(Some((session, role))) => {
                self.auth = AuthState::Authenticated { session, role };
                self.remount();
            }
            AuthEvent::Restored(None) => {
                self.auth = AuthState::Unauthenticated;
                self.remount();
            }
            AuthEvent::SignedIn { session, role } => self.signed_in(session, role),
            AuthEvent::SignedUp(SignUpOutcome::SignedIn { session, role }) => {
                self.signed_in(session, Some(role));
            }
            AuthEvent::SignedUp(SignUpOutcome::ConfirmationRequired { email }) => {
                match self.page.as_mut().and_then(Page::auth_page) {
                    Some(page) => page.awaiting_confirmation(&email),
                    None => debug!("sign-up confirmation arrived after leaving the form"),
                }
            }
            AuthEvent::Failed(message) => match self.page.as_mut().and_then(Page::auth_page) {
                Some(page) => page.failed(message),
                None => warn!(error = %message, "auth failed after leaving the form"),
            },
            AuthEvent::Refreshed(result) => {
                self.apply_refresh(result, chrono::Utc::now().timestamp());
            }
            AuthEvent::UserUpdated(user) => {
                if let AuthState::Authenticated { session, .. } = &mut self.auth {
                    if session.user.id == user.id {
                        session.user = user;
                    }
                }
            }
        }
    }

    fn render_blocked(&self, ctx: &egui::Context, error: &ConfigError) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(120.0);
                ui.heading("SkillBridge can't start");
                self.theme
                    .chip_frame(self.theme.danger_soft)
                    .show(ui, |ui| {
                        ui.label(RichText::new(error.to_string()).color(self.theme.danger));
                    });
                ui.label(
                    RichText::new(
                        "Set the missing values in your environment or a .env file, then restart.",
                    )
                    .color(self.theme.text_muted),
                );
            });
        });
    }

    fn render_top_bar(&self, ctx: &egui::Context) -> Option<NavRequest> {
        let mut request = None;
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let home = if self.auth.is_authenticated() {
                    Route::home_for(self.auth.role())
                } else {
                    Route::Landing
                };
                if ui
                    .add(egui::Button::new(
                        RichText::new("SkillBridge")
                            .strong()
                            .size(18.0)
                            .color(self.theme.accent_primary),
                    ).frame(false))
                    .clicked()
                {
                    request = Some(NavRequest::Go(home));
                }
                ui.separator();
                for route in [Route::Projects, Route::Mentors, Route::Leaderboard] {
                    let label = match route {
                        Route::Projects => "Projects",
                        Route::Mentors => "Mentors",
                        _ => "Leaderboard",
                    };
                    let selected = self.shown.as_ref() == Some(&route);
                    if ui.selectable_label(selected, label).clicked() {
                        request = Some(NavRequest::Go(route));
                    }
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    match &self.auth {
                        AuthState::Loading => {
                            ui.spinner();
                        }
                        AuthState::Unauthenticated => {
                            if ui.button("Sign Up").clicked() {
                                request = Some(NavRequest::Go(Route::Signup));
                            }
                            if ui.button("Log In").clicked() {
                                request = Some(NavRequest::Go(Route::Login));
                            }
                        }
                        AuthState::Authenticated { session, role } => {
                            if ui.button("Sign Out").clicked() {
                                request = Some(NavRequest::SignOut);
                            }
                            if ui.button("Dashboard").clicked() {
                                request = Some(NavRequest::Go(Route::home_for(*role)));
                            }
                            if let Some(email) = &session.user.email {
                                ui.label(RichText::new(email).color(self.theme.text_muted));
                            }
                        }
                    }
                });
            });
        });
        request
    }

    fn sidebar_entries(&self) -> Vec<(&'static str, Route)> {
        if self.auth.is_organization() {
            vec![
                ("Home", Route::OrgDashboard),
                ("Browse Projects", Route::Projects),
                ("Messages", Route::Messages),
                ("Profile", Route::Settings),
            ]
        } else {
            vec![
                ("Home", Route::Dashboard),
                ("Projects", Route::Projects),
                ("Applications", Route::Applications),
                ("Messages", Route::Messages),
                ("Leaderboard", Route::Leaderboard),
                ("Profile", Route::Settings),
            ]
        }
    }

    fn render_sidebar(&self, ctx: &egui::Context) -> Option<NavRequest> {
        let shows_sidebar = self.auth.is_authenticated()
            && self.shown.as_ref().is_some_and(Route::has_sidebar);
        if !shows_sidebar {
            return None;
        }
        let mut request = None;
        egui::SidePanel::left("sidebar")
            .resizable(false)
            .exact_width(self.theme.sidebar_width)
            .show(ctx, |ui| {
                ui.add_space(self.theme.spacing_8);
                for (label, route) in self.sidebar_entries() {
                    let text = match (route == Route::Messages, self.inbox_unread) {
                        (true, Some(unread)) if unread > 0 => format!("{label}  ({unread})"),
                        _ => label.to_string(),
                    };
                    let selected = self.shown.as_ref() == Some(&route);
                    if ui.selectable_label(selected, text).clicked() {
                        request = Some(NavRequest::Go(route));
                    }
                }
            });
        request
    }

    fn render_center(&mut self, ctx: &egui::Context) -> Option<NavRequest> {
        let Shell::Ready(services) = &self.shell else {
            return None;
        };
        let mut navigation = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(page) = self.page.as_mut() else {
                ui.centered_and_justified(|ui| {
                    ui.spinner();
                });
                return;
            };
            let mut page_ctx = PageCtx::new(services, &self.auth, &self.theme);
            page.show(ui, &mut page_ctx);
            navigation = page_ctx.take_navigation();
            if let Some(unread) = page.unread() {
                self.inbox_unread = Some(unread);
            }
        });
        navigation.map(NavRequest::Go)
    }
}

impl eframe::App for SkillBridgeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Shell::Blocked(error) = &self.shell {
            self.render_blocked(ctx, error);
            return;
        }

        self.drain_events();
        let now = chrono::Utc::now().timestamp();
        self.keep_session_fresh(now);
        if let Some(secs) = self.auth.session().and_then(|session| session.refresh_in(now)) {
            ctx.request_repaint_after(Duration::from_secs(secs.max(1).unsigned_abs()));
        }
        let requests = [
            self.render_top_bar(ctx),
            self.render_sidebar(ctx),
            self.render_center(ctx),
        ];
        for request in requests.into_iter().flatten() {
            match request {
                NavRequest::Go(route) => self.navigate(route),
                NavRequest::SignOut => self.sign_out(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::fake::{session_for, FakeBackend, FakeCall};
    use crate::config::AppConfig;
    use crate::data::{FallbackReason, Fetched};
    use crate::event::{EventSender, PagePayload};
    use std::sync::{mpsc, Arc};
    use crate::session::store;
    use tokio::runtime::Handle;

    fn app() -> (SkillBridgeApp, tempfile::TempDir) {
        let (app, _backend, dir) = app_with(FakeBackend::default());
        (app, dir)
    }

    fn app_with(backend: FakeBackend) -> (SkillBridgeApp, Arc<FakeBackend>, tempfile::TempDir) {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let session_dir = dir.path().to_string_lossy().to_string();
        let config = AppConfig::from_lookup(|key| match key {
            "SUPABASE_URL" => Some("https://example.supabase.co".to_string()),
            "SUPABASE_ANON_KEY" => Some("anon".to_string()),
            "SKILLBRIDGE_SESSION_DIR" => Some(session_dir.clone()),
            _ => None,
        })
        .expect("config should load");
        let (tx, rx) = mpsc::channel();
        let backend = Arc::new(backend);
        let services = Services {
            backend: backend.clone(),
            config,
            runtime: Handle::current(),
            events: EventSender::new(tx),
        };
        (SkillBridgeApp::new(rx, services), backend, dir)
    }

    async fn settle(app: &mut SkillBridgeApp) {
        tokio::time::sleep(Duration::from_millis(20)).await;
        app.drain_events();
    }

    #[tokio::test(start_paused = true)]
    async fn spinner_until_restore_then_landing() {
        let (mut app, _dir) = app();
        assert!(app.auth.is_loading());
        assert!(app.page.is_none());

        settle(&mut app).await;
        assert_eq!(app.auth, AuthState::Unauthenticated);
        assert_eq!(app.shown, Some(Route::Landing));
    }

    #[tokio::test(start_paused = true)]
    async fn guarded_route_waits_for_sign_in_then_goes_home() {
        let (mut app, _dir) = app();
        settle(&mut app).await;

        app.navigate(Route::Settings);
        assert_eq!(app.shown, Some(Route::Login));

        app.apply_event(AppEvent::Auth(AuthEvent::SignedIn {
            session: session_for("user-1", "org@example.com"),
            role: Some(Role::Organization),
        }));
        assert_eq!(app.shown, Some(Route::OrgDashboard));

        app.navigate(Route::Login);
        assert_eq!(app.shown, Some(Route::OrgDashboard));
    }

    #[tokio::test(start_paused = true)]
    async fn auth_failure_is_shown_on_the_form() {
        let (mut app, _dir) = app();
        settle(&mut app).await;
        app.navigate(Route::Login);

        app.apply_event(AppEvent::Auth(AuthEvent::Failed(
            "Invalid login credentials".to_string(),
        )));
        let page = app
            .page
            .as_mut()
            .and_then(Page::auth_page)
            .expect("login form is mounted");
        assert_eq!(page.error(), Some("Invalid login credentials"));
    }

    #[tokio::test(start_paused = true)]
    async fn late_results_for_a_left_page_are_dropped() {
        let (mut app, _dir) = app();
        settle(&mut app).await;
        app.navigate(Route::Projects);
        let stale = app.page.as_ref().and_then(Page::owner).expect("projects page has an owner");

        app.navigate(Route::Mentors);
        app.apply_event(AppEvent::Page {
            owner: stale,
            payload: PagePayload::Projects(Fetched::Fallback {
                data: Vec::new(),
                reason: FallbackReason::Empty,
            }),
        });
        assert!(matches!(app.page, Some(Page::Mentors(_))));
        assert_ne!(app.page.as_ref().and_then(Page::owner), Some(stale));
    }

    #[tokio::test(start_paused = true)]
    async fn messages_page_reports_unread_and_sign_out_returns_to_landing() {
        let (mut app, _dir) = app();
        settle(&mut app).await;
        app.apply_event(AppEvent::Auth(AuthEvent::SignedIn {
            session: session_for("user-1", "ada@example.com"),
            role: Some(Role::Student),
        }));
        assert_eq!(app.shown, Some(Route::Dashboard));

        app.navigate(Route::Messages);
        settle(&mut app).await;
        let expected: u32 = crate::samples::conversations()
            .iter()
            .map(|conversation| conversation.unread_count)
            .sum();
        assert_eq!(app.page.as_ref().and_then(Page::unread), Some(expected));

        app.sign_out();
        assert_eq!(app.auth, AuthState::Unauthenticated);
        assert_eq!(app.shown, Some(Route::Landing));
    }

    fn expiring_session(now: i64, refresh_token: &str) -> AuthSession {
        let mut session = session_for("user-1", "ada@example.com");
        session.access_token = "access-stale".to_string();
        session.refresh_token = refresh_token.to_string();
        session.expires_at = Some(now + 30);
        session
    }

    fn refresh_calls(backend: &FakeBackend) -> usize {
        backend
            .calls()
            .iter()
            .filter(|call| matches!(call, FakeCall::Refresh(_)))
            .count()
    }

    #[tokio::test(start_paused = true)]
    async fn expiring_access_token_is_refreshed_once_and_persisted() {
        let (mut app, backend, dir) = app_with(FakeBackend::default());
        settle(&mut app).await;
        let now = 1_700_000_000;
        app.apply_event(AppEvent::Auth(AuthEvent::SignedIn {
            session: expiring_session(now, "refresh-stale"),
            role: Some(Role::Student),
        }));

        app.keep_session_fresh(now);
        app.keep_session_fresh(now);
        settle(&mut app).await;

        let session = app.auth.session().expect("still signed in");
        assert_eq!(session.access_token, "access-user-1");
        assert_eq!(refresh_calls(&backend), 1);
        let (stored, _) = store::load(dir.path());
        assert_eq!(
            stored.map(|stored| stored.refresh_token),
            Some("refresh-user-1".to_string())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn token_far_from_expiry_is_left_alone() {
        let (mut app, backend, _dir) = app_with(FakeBackend::default());
        settle(&mut app).await;
        let now = 1_700_000_000;
        let mut session = expiring_session(now, "refresh-stale");
        session.expires_at = Some(now + 3_600);
        app.apply_event(AppEvent::Auth(AuthEvent::SignedIn {
            session,
            role: Some(Role::Student),
        }));

        app.keep_session_fresh(now);
        settle(&mut app).await;
        assert_eq!(refresh_calls(&backend), 0);
        assert_eq!(
            app.auth.session().map(|session| session.access_token.as_str()),
            Some("access-stale")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn rejected_refresh_signs_out_of_protected_pages() {
        let (mut app, _backend, _dir) = app_with(FakeBackend::default());
        settle(&mut app).await;
        let now = 1_700_000_000;
        app.apply_event(AppEvent::Auth(AuthEvent::SignedIn {
            session: expiring_session(now, "expired"),
            role: Some(Role::Student),
        }));
        assert_eq!(app.shown, Some(Route::Dashboard));

        app.keep_session_fresh(now);
        settle(&mut app).await;
        assert_eq!(app.auth, AuthState::Unauthenticated);
        assert_eq!(app.shown, Some(Route::Login));
    }

    #[tokio::test(start_paused = true)]
    async fn network_refresh_failure_waits_before_retrying() {
        let (mut app, _backend, _dir) = app_with(FakeBackend::default());
        settle(&mut app).await;
        let now = 1_700_000_000;
        app.apply_event(AppEvent::Auth(AuthEvent::SignedIn {
            session: expiring_session(now, "refresh-stale"),
            role: Some(Role::Student),
        }));

        app.apply_refresh(Err(BackendError::Http("offline".to_string())), now);
        assert!(app.auth.is_authenticated());
        app.keep_session_fresh(now + 1);
        assert!(app.refreshing.is_none());
        app.keep_session_fresh(now + REFRESH_RETRY_SECS);
        assert!(app.refreshing.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn saved_metadata_replaces_the_session_user() {
        let (mut app, _dir) = app();
        settle(&mut app).await;
        app.apply_event(AppEvent::Auth(AuthEvent::SignedIn {
            session: session_for("user-1", "ada@example.com"),
            role: Some(Role::Student),
        }));

        let mut user = session_for("user-1", "ada@example.com").user;
        user.metadata.first_name = Some("Ada".to_string());
        app.apply_event(AppEvent::Auth(AuthEvent::UserUpdated(user.clone())));
        assert_eq!(app.auth.user(), Some(&user));

        let mut stranger = session_for("user-2", "eve@example.com").user;
        stranger.metadata.first_name = Some("Eve".to_string());
        app.apply_event(AppEvent::Auth(AuthEvent::UserUpdated(stranger)));
        assert_eq!(app.auth.user(), Some(&user));
    }
}
