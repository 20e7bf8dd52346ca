//! Login and sign-up share one form; the mode toggles in place.

use super::PageCtx;
use crate::event::{AppEvent, AuthEvent};
use crate::models::Role;
use crate::session::auth as flows;
use eframe::egui::{self, RichText};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    SignUp,
}

pub struct AuthPage {
    mode: AuthMode,
    email: String,
    password: String,
    role: Role,
    submitting: bool,
    error: Option<String>,
    notice: Option<String>,
}

impl AuthPage {
    fn with_mode(mode: AuthMode) -> Self {
        Self {
            mode,
            email: String::new(),
            password: String::new(),
            role: Role::Student,
            submitting: false,
            error: None,
            notice: None,
        }
    }

    pub fn login() -> Self {
        Self::with_mode(AuthMode::Login)
    }

    pub fn sign_up() -> Self {
        Self::with_mode(AuthMode::SignUp)
    }

    #[cfg(test)]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Backend message shown exactly as received.
    pub fn failed(&mut self, message: String) {
        self.submitting = false;
        self.error = Some(message);
    }

    pub fn awaiting_confirmation(&mut self, email: &str) {
        self.submitting = false;
        self.mode = AuthMode::Login;
        self.password.clear();
        self.notice = Some(format!(
            "Check {email} for a confirmation link, then log in."
        ));
    }

    fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            AuthMode::Login => AuthMode::SignUp,
            AuthMode::SignUp => AuthMode::Login,
        };
        self.error = None;
    }

    fn can_submit(&self) -> bool {
        !self.submitting && !self.email.trim().is_empty() && !self.password.is_empty()
    }

    fn submit(&mut self, ctx: &PageCtx<'_>) {
        if !self.can_submit() {
            return;
        }
        self.submitting = true;
        self.error = None;
        self.notice = None;

        let services = ctx.services;
        let backend = services.backend.clone();
        let session_dir = services.config.session_dir.clone();
        let events = services.events.clone();
        let email = self.email.clone();
        let password = self.password.clone();
        let mode = self.mode;
        let role = self.role;
        info!(?mode, "submitting auth form");

        // Auth flows are not page-scoped: a result landing after navigation still signs in.
        services.runtime.spawn(async move {
            let event = match mode {
                AuthMode::Login => {
                    match flows::sign_in(backend.as_ref(), &session_dir, &email, &password).await {
                        Ok((session, role)) => AuthEvent::SignedIn { session, role },
                        Err(err) => AuthEvent::Failed(err.to_string()),
                    }
                }
                AuthMode::SignUp => {
                    match flows::sign_up(backend.as_ref(), &session_dir, &email, &password, role)
                        .await
                    {
                        Ok(outcome) => AuthEvent::SignedUp(outcome),
                        Err(err) => AuthEvent::Failed(err.to_string()),
                    }
                }
            };
            events.send(AppEvent::Auth(event));
        });
    }

    pub fn show(&mut self, ui: &mut egui::Ui, ctx: &mut PageCtx<'_>) {
        let theme = ctx.theme;
        let mut submit = false;
        ui.vertical_centered(|ui| {
            ui.add_space(theme.spacing_24 * 2.0);
            ui.set_max_width(420.0);
            theme.card_frame().show(ui, |ui| {
                ui.set_width(380.0);
                ui.vertical_centered(|ui| {
                    ui.heading("Welcome to SkillBridge");
                    ui.label(
                        RichText::new(
                            "Join our community of students and organizations to connect on micro-internships and mentorships.",
                        )
                        .color(theme.text_muted),
                    );
                });
                ui.add_space(theme.spacing_12);

                ui.label("Email");
                ui.add(
                    egui::TextEdit::singleline(&mut self.email)
                        .hint_text("you@example.com")
                        .desired_width(f32::INFINITY),
                );
                ui.label("Password");
                let password = ui.add(
                    egui::TextEdit::singleline(&mut self.password)
                        .password(true)
                        .desired_width(f32::INFINITY),
                );
                if password.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    submit = true;
                }

                if self.mode == AuthMode::SignUp {
                    ui.label("Choose your role");
                    ui.horizontal(|ui| {
                        ui.selectable_value(&mut self.role, Role::Student, "Student");
                        ui.selectable_value(&mut self.role, Role::Organization, "Organization");
                    });
                }

                if let Some(error) = &self.error {
                    theme.chip_frame(theme.danger_soft).show(ui, |ui| {
                        ui.label(RichText::new(error).color(theme.danger));
                    });
                }
                if let Some(notice) = &self.notice {
                    theme.chip_frame(theme.success_soft).show(ui, |ui| {
                        ui.label(RichText::new(notice).color(theme.success));
                    });
                }

                let label = match (self.submitting, self.mode) {
                    (true, _) => "Please wait...",
                    (false, AuthMode::SignUp) => "Sign Up",
                    (false, AuthMode::Login) => "Log In",
                };
                let button = egui::Button::new(label).min_size(egui::vec2(ui.available_width(), 32.0));
                if ui.add_enabled(self.can_submit(), button).clicked() {
                    submit = true;
                }

                ui.vertical_centered(|ui| {
                    let toggle = match self.mode {
                        AuthMode::SignUp => "Already have an account? Log in",
                        AuthMode::Login => "Don't have an account? Sign up",
                    };
                    if ui.link(toggle).clicked() {
                        self.toggle_mode();
                    }
                });
            });
        });

        if submit {
            self.submit(ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_keeps_the_form_usable_with_the_verbatim_message() {
        let mut page = AuthPage::login();
        page.email = "ada@example.com".to_string();
        page.password = "wrong".to_string();
        page.submitting = true;

        page.failed("Invalid login credentials".to_string());
        assert!(!page.submitting);
        assert_eq!(page.error(), Some("Invalid login credentials"));
        assert!(page.can_submit());
    }

    #[test]
    fn confirmation_switches_to_login() {
        let mut page = AuthPage::sign_up();
        page.password = "secret1".to_string();
        page.awaiting_confirmation("new@example.com");
        assert_eq!(page.mode, AuthMode::Login);
        assert!(page.password.is_empty());
        assert!(page.notice.as_deref().is_some_and(|n| n.contains("new@example.com")));
    }

    #[test]
    fn toggling_clears_a_stale_error() {
        let mut page = AuthPage::login();
        page.failed("Invalid login credentials".to_string());
        page.toggle_mode();
        assert_eq!(page.mode, AuthMode::SignUp);
        assert!(page.error().is_none());
    }

    #[test]
    fn blank_fields_cannot_submit() {
        let mut page = AuthPage::login();
        assert!(!page.can_submit());
        page.email = "   ".to_string();
        page.password = "secret1".to_string();
        assert!(!page.can_submit());
    }
}
