use super::widgets;
use super::{Load, PageCtx, Services};
use crate::action::{ActionExecutor, ActionIntent, ActionKind, ActionOutput};
use crate::backend::Backend;
use crate::error::BackendResult;
use crate::event::{ActionEvent, AppEvent, AuthEvent, EventSender, OwnerToken, PagePayload};
use crate::models::Role;
use crate::profile::{self, PasswordForm, Profile, ProfileForm, INDUSTRIES};
use crate::session::{AuthSession, AuthState};
use eframe::egui::{self, RichText};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SettingsTab {
    #[default]
    Profile,
    Account,
    Notifications,
    Privacy,
}

impl SettingsTab {
    pub const ALL: [SettingsTab; 4] = [
        Self::Profile,
        Self::Account,
        Self::Notifications,
        Self::Privacy,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Profile => "Profile",
            Self::Account => "Account",
            Self::Notifications => "Notifications",
            Self::Privacy => "Privacy",
        }
    }
}

/// Session-only toggles; nothing here is sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationPrefs {
    pub email: [(&'static str, &'static str, bool); 4],
    pub push: [(&'static str, &'static str, bool); 2],
}

impl Default for NotificationPrefs {
    fn default() -> Self {
        Self {
            email: [
                ("New project matches", "Get notified when new projects match your skills", true),
                ("Application updates", "Updates on your project applications", true),
                ("New messages", "When you receive new messages", true),
                ("Application deadlines", "Reminders for upcoming deadlines", false),
            ],
            push: [
                ("Messages", "Push notifications for new messages", true),
                ("Application updates", "Push notifications for application status changes", false),
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

/// Saves the profile and hands the updated auth user to the app so later
/// merges start from what the server now holds.
async fn save_and_share_user(
    backend: &dyn Backend,
    session: &AuthSession,
    role: Option<Role>,
    form: &ProfileForm,
    events: &EventSender,
) -> BackendResult<ActionOutput> {
    let saved = profile::save_profile(backend, session, role, form).await?;
    if let Some(user) = saved.user {
        events.send(AppEvent::Auth(AuthEvent::UserUpdated(user)));
    }
    Ok(ActionOutput::Notice(saved.outcome.message().to_string()))
}

pub struct SettingsPage {
    owner: OwnerToken,
    tab: SettingsTab,
    profile: Load<Profile>,
    form: ProfileForm,
    password: PasswordForm,
    notifications: NotificationPrefs,
    visibility: Visibility,
    executor: ActionExecutor,
}

impl SettingsPage {
    pub fn new(services: &Services, auth: &AuthState) -> Self {
        let owner = OwnerToken::next();
        let backend = services.backend.clone();
        let session = auth.session().cloned();
        let profile = Load::start(services, owner, async move {
            let profile = match session {
                Some(session) => {
                    let row = match backend.fetch_profile(&session).await {
                        Ok(row) => row,
                        Err(err) => {
                            warn!(error = %err, "failed to load profile row, using account metadata");
                            None
                        }
                    };
                    Profile::resolve(row.as_ref(), &session.user)
                }
                None => Profile::default(),
            };
            PagePayload::Profile(profile)
        });
        Self {
            owner,
            tab: SettingsTab::default(),
            profile,
            form: ProfileForm::default(),
            password: PasswordForm::default(),
            notifications: NotificationPrefs::default(),
            visibility: Visibility::default(),
            executor: services.executor(owner),
        }
    }

    pub fn owner(&self) -> OwnerToken {
        self.owner
    }

    pub fn on_payload(&mut self, payload: PagePayload) {
        if let PagePayload::Profile(profile) = payload {
            self.form = ProfileForm::from_profile(&profile);
            self.profile.finish(profile);
        }
    }

    pub fn on_action(&mut self, event: ActionEvent) {
        let Some(completion) = self.executor.handle(event) else {
            return;
        };
        if completion.outcome.is_err() {
            return;
        }
        match completion.intent {
            ActionIntent::PasswordChange => self.password = PasswordForm::default(),
            ActionIntent::ProfileSave => {
                if let Some(profile) = self.profile.ready_mut() {
                    let role = profile.role;
                    self.form.apply_to(profile, role);
                }
            }
            _ => {}
        }
    }

    fn save_profile(&mut self, ctx: &PageCtx<'_>) {
        let Some(session) = ctx.auth.session().cloned() else {
            self.executor
                .fail_now(ActionKind::ProfileSave, "You need to sign in first");
            return;
        };
        let backend = ctx.services.backend.clone();
        let role = ctx.auth.role();
        let form = self.form.clone();
        let events = ctx.services.events.clone();
        self.executor.start(ActionIntent::ProfileSave, async move {
            save_and_share_user(backend.as_ref(), &session, role, &form, &events).await
        });
    }

    fn change_password(&mut self, ctx: &PageCtx<'_>) {
        let password = match self.password.validate() {
            Ok(password) => password,
            Err(message) => {
                self.executor.fail_now(ActionKind::PasswordChange, message);
                return;
            }
        };
        let Some(session) = ctx.auth.session().cloned() else {
            self.executor
                .fail_now(ActionKind::PasswordChange, "You need to sign in first");
            return;
        };
        let backend = ctx.services.backend.clone();
        self.executor.start(ActionIntent::PasswordChange, async move {
            profile::change_password(backend.as_ref(), &session, password)
                .await
                .map(|()| ActionOutput::Done)
        });
    }

    fn profile_tab(&mut self, ui: &mut egui::Ui, ctx: &PageCtx<'_>) {
        let theme = ctx.theme;
        if self.profile.ready().is_none() {
            widgets::loading(ui, "Loading profile...");
            return;
        }
        let role = ctx.auth.role();
        let busy = self.executor.is_busy(ActionKind::ProfileSave);
        let mut save = false;

        widgets::section_title(ui, "Profile Information");
        widgets::status_banner(ui, theme, self.executor.status(ActionKind::ProfileSave));
        egui::Grid::new("profile_form")
            .num_columns(2)
            .spacing([theme.spacing_12, theme.spacing_8])
            .show(ui, |ui| {
                let field = |ui: &mut egui::Ui, label: &str, value: &mut String| {
                    ui.label(label);
                    ui.add(egui::TextEdit::singleline(value).desired_width(320.0));
                    ui.end_row();
                };
                field(ui, "First Name", &mut self.form.first_name);
                field(ui, "Last Name", &mut self.form.last_name);
                match role {
                    Some(Role::Organization) => {
                        field(ui, "Organization Name", &mut self.form.organization_name);
                        ui.label("Industry");
                        let selected = if self.form.industry.is_empty() {
                            "Select industry"
                        } else {
                            self.form.industry.as_str()
                        };
                        egui::ComboBox::from_id_salt("industry")
                            .selected_text(selected.to_string())
                            .show_ui(ui, |ui| {
                                for industry in INDUSTRIES {
                                    ui.selectable_value(
                                        &mut self.form.industry,
                                        industry.to_string(),
                                        industry,
                                    );
                                }
                            });
                        ui.end_row();
                    }
                    _ => {
                        field(ui, "University", &mut self.form.university);
                        field(ui, "Major", &mut self.form.major);
                    }
                }
                ui.label("Bio");
                ui.add(
                    egui::TextEdit::multiline(&mut self.form.bio)
                        .desired_rows(4)
                        .desired_width(320.0),
                );
                ui.end_row();
            });
        if ui
            .add_enabled(!busy, egui::Button::new("Save Changes"))
            .clicked()
        {
            save = true;
        }
        if save {
            self.save_profile(ctx);
        }
    }

    fn account_tab(&mut self, ui: &mut egui::Ui, ctx: &PageCtx<'_>) {
        let theme = ctx.theme;
        widgets::section_title(ui, "Account Settings");
        let email = self
            .profile
            .ready()
            .map(|profile| profile.email.clone())
            .or_else(|| ctx.auth.user().and_then(|user| user.email.clone()))
            .unwrap_or_default();
        ui.label("Email");
        let mut shown = email;
        ui.add_enabled(false, egui::TextEdit::singleline(&mut shown).desired_width(320.0));
        ui.label(
            RichText::new("Your email address cannot be changed.")
                .small()
                .color(theme.text_muted),
        );
        let account_type = match ctx.auth.role() {
            Some(Role::Organization) => "Organization",
            Some(Role::Student) => "Student",
            None => "Unknown",
        };
        ui.label(format!("Account type: {account_type}"));

        ui.add_space(theme.spacing_16);
        widgets::section_title(ui, "Change Password");
        widgets::status_banner(ui, theme, self.executor.status(ActionKind::PasswordChange));
        let busy = self.executor.is_busy(ActionKind::PasswordChange);
        ui.label("New Password");
        ui.add(
            egui::TextEdit::singleline(&mut self.password.new_password)
                .password(true)
                .desired_width(320.0),
        );
        ui.label("Confirm New Password");
        ui.add(
            egui::TextEdit::singleline(&mut self.password.confirm_password)
                .password(true)
                .desired_width(320.0),
        );
        if ui
            .add_enabled(!busy, egui::Button::new("Update Password"))
            .clicked()
        {
            self.change_password(ctx);
        }
    }

    fn notifications_tab(&mut self, ui: &mut egui::Ui, ctx: &PageCtx<'_>) {
        let theme = ctx.theme;
        widgets::section_title(ui, "Notification Preferences");
        ui.label(RichText::new("Email Notifications").strong());
        for (label, description, on) in self.notifications.email.iter_mut() {
            ui.checkbox(on, *label);
            ui.label(RichText::new(*description).small().color(theme.text_muted));
        }
        ui.add_space(theme.spacing_8);
        ui.label(RichText::new("Push Notifications").strong());
        for (label, description, on) in self.notifications.push.iter_mut() {
            ui.checkbox(on, *label);
            ui.label(RichText::new(*description).small().color(theme.text_muted));
        }
    }

    fn privacy_tab(&mut self, ui: &mut egui::Ui, ctx: &PageCtx<'_>) {
        let theme = ctx.theme;
        widgets::section_title(ui, "Privacy Settings");
        ui.label(RichText::new("Profile Visibility").strong());
        ui.radio_value(&mut self.visibility, Visibility::Public, "Public");
        ui.label(
            RichText::new("Your profile is visible to all users")
                .small()
                .color(theme.text_muted),
        );
        ui.radio_value(&mut self.visibility, Visibility::Private, "Private");
        ui.label(
            RichText::new("Only organizations you apply to can see your profile")
                .small()
                .color(theme.text_muted),
        );
    }

    pub fn show(&mut self, ui: &mut egui::Ui, ctx: &mut PageCtx<'_>) {
        let theme = ctx.theme;
        widgets::page_header(
            ui,
            theme,
            "Settings",
            "Manage your account settings and preferences.",
        );
        if let Some(profile) = self.profile.ready() {
            ui.label(RichText::new(profile.display_name()).strong());
        }
        ui.horizontal(|ui| {
            for tab in SettingsTab::ALL {
                ui.selectable_value(&mut self.tab, tab, tab.label());
            }
        });
        ui.separator();

        egui::ScrollArea::vertical().show(ui, |ui| {
            theme.card_frame().show(ui, |ui| {
                ui.set_width(ui.available_width());
                match self.tab {
                    SettingsTab::Profile => self.profile_tab(ui, ctx),
                    SettingsTab::Account => self.account_tab(ui, ctx),
                    SettingsTab::Notifications => self.notifications_tab(ui, ctx),
                    SettingsTab::Privacy => self.privacy_tab(ui, ctx),
                }
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::executor::tests::executor;
    use crate::action::Phase;
    use crate::backend::fake::{session_for, FakeBackend};
    use crate::error::BackendError;
    use crate::profile::PROFILE_SAVED_NEEDS_MIGRATION;
    use std::sync::{mpsc, Arc};
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn missing_column_save_reports_the_migration_notice() {
        let (mut executor, rx) = executor();
        let backend = Arc::new(FakeBackend::default());
        backend.fail_update_profile(BackendError::MissingColumn("university".to_string()));
        let session = session_for("user-1", "ada@example.com");
        let form = ProfileForm {
            first_name: "Ada".to_string(),
            ..ProfileForm::default()
        };

        let (tx, app_rx) = mpsc::channel();
        let events = EventSender::new(tx);
        executor.start(ActionIntent::ProfileSave, async move {
            save_and_share_user(backend.as_ref(), &session, Some(Role::Student), &form, &events)
                .await
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        for event in rx.try_iter() {
            if let AppEvent::Action { event, .. } = event {
                executor.handle(event);
            }
        }

        let status = executor.status(ActionKind::ProfileSave);
        assert_eq!(status.phase(), Phase::Succeeded);
        assert_eq!(status.message(), PROFILE_SAVED_NEEDS_MIGRATION);

        let shared: Vec<_> = app_rx.try_iter().collect();
        assert!(matches!(
            shared.as_slice(),
            [AppEvent::Auth(AuthEvent::UserUpdated(user))]
                if user.metadata.first_name.as_deref() == Some("Ada")
        ));
    }

    #[test]
    fn saved_form_updates_the_displayed_profile() {
        let mut profile = Profile {
            email: "org@example.com".to_string(),
            role: Some(Role::Organization),
            organization_name: "Old Name".to_string(),
            university: "Untouched".to_string(),
            ..Profile::default()
        };
        let form = ProfileForm {
            first_name: " Grace ".to_string(),
            organization_name: "Green Earth NGO".to_string(),
            university: "Ignored".to_string(),
            ..ProfileForm::default()
        };

        form.apply_to(&mut profile, Some(Role::Organization));
        assert_eq!(profile.first_name, "Grace");
        assert_eq!(profile.display_name(), "Green Earth NGO");
        assert_eq!(profile.university, "Untouched");
    }

    #[test]
    fn preferences_start_with_the_documented_defaults() {
        let prefs = NotificationPrefs::default();
        assert_eq!(prefs.email.iter().filter(|(_, _, on)| *on).count(), 3);
        assert_eq!(SettingsTab::ALL.len(), 4);
        assert_eq!(Visibility::default(), Visibility::Public);
    }
}
