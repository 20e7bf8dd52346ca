use super::widgets;
use super::{Load, PageCtx, Services};
use crate::data::{self, Fetched, DASHBOARD_APPLICATION_LIMIT, DASHBOARD_PROJECT_LIMIT};
use crate::event::{OwnerToken, PagePayload};
use crate::models::{Application, ApplicationStatus, Project};
use crate::router::Route;
use crate::session::{AuthState, AuthUser};
use eframe::egui::{self, RichText};

pub struct StudentDashboard {
    pub projects: Fetched<Vec<Project>>,
    pub applications: Fetched<Vec<Application>>,
}

pub struct StudentDashboardPage {
    owner: OwnerToken,
    greeting: String,
    data: Load<StudentDashboard>,
}

/// First name from metadata, else the local part of the e-mail.
pub fn greeting_name(user: &AuthUser) -> String {
    user.metadata
        .first_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .or_else(|| {
            user.email
                .as_deref()
                .and_then(|email| email.split('@').next())
                .filter(|local| !local.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| "there".to_string())
}

impl StudentDashboardPage {
    pub fn new(services: &Services, auth: &AuthState) -> Self {
        let owner = OwnerToken::next();
        let backend = services.backend.clone();
        let session = auth.session().cloned();
        let data = Load::start(services, owner, async move {
            let (projects, applications) = tokio::join!(
                data::load_projects(
                    backend.as_ref(),
                    session.as_ref(),
                    Some(DASHBOARD_PROJECT_LIMIT)
                ),
                data::load_applications(
                    backend.as_ref(),
                    session.as_ref(),
                    Some(DASHBOARD_APPLICATION_LIMIT)
                ),
            );
            PagePayload::StudentDashboard {
                projects,
                applications,
            }
        });
        Self {
            owner,
            greeting: auth.user().map(greeting_name).unwrap_or_default(),
            data,
        }
    }

    pub fn owner(&self) -> OwnerToken {
        self.owner
    }

    pub fn on_payload(&mut self, payload: PagePayload) {
        if let PagePayload::StudentDashboard {
            projects,
            applications,
        } = payload
        {
            self.data.finish(StudentDashboard {
                projects,
                applications,
            });
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui, ctx: &mut PageCtx<'_>) {
        let theme = ctx.theme;
        widgets::page_header(
            ui,
            theme,
            &format!("Welcome back, {}!", self.greeting),
            "Discover new projects and continue building your skills.",
        );

        let Some(dashboard) = self.data.ready() else {
            widgets::loading(ui, "Loading your dashboard...");
            return;
        };

        let mut go: Option<Route> = None;
        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.columns(2, |columns| {
                let left = &mut columns[0];
                left.horizontal(|ui| {
                    widgets::section_title(ui, "Recommended Projects");
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.link("View All").clicked() {
                            go = Some(Route::Projects);
                        }
                    });
                });
                widgets::fallback_note(left, theme, &dashboard.projects);
                for project in dashboard.projects.data() {
                    theme.card_frame().show(left, |ui| {
                        ui.set_width(ui.available_width());
                        ui.label(RichText::new(&project.title).strong());
                        ui.label(RichText::new(&project.organization).color(theme.text_muted));
                        ui.label(RichText::new(format!("⏱ {}", project.duration)).small());
                        widgets::skill_chips(ui, theme, &project.skills);
                        if ui.button("Apply").clicked() {
                            go = Some(Route::ProjectDetail(project.id.clone()));
                        }
                    });
                }

                let right = &mut columns[1];
                widgets::section_title(right, "Application Status");
                widgets::fallback_note(right, theme, &dashboard.applications);
                for application in dashboard.applications.data() {
                    theme.card_frame().show(right, |ui| {
                        ui.set_width(ui.available_width());
                        ui.label(RichText::new(&application.project).strong());
                        ui.label(RichText::new(&application.organization).color(theme.text_muted));
                        ui.horizontal(|ui| {
                            widgets::status_chip(ui, theme, application.status);
                            ui.label(RichText::new(&application.applied_date).small());
                        });
                    });
                }
                if right.link("See all applications").clicked() {
                    go = Some(Route::Applications);
                }

                widgets::section_title(right, "Your Progress");
                let accepted = dashboard
                    .applications
                    .data()
                    .iter()
                    .filter(|a| a.status == ApplicationStatus::Accepted)
                    .count();
                theme.card_frame().show(right, |ui| {
                    ui.set_width(ui.available_width());
                    ui.label(format!("Projects Completed: {accepted}"));
                    ui.label("Points Earned: 245");
                    ui.label("Current Rank: #47");
                    if ui.link("Open leaderboard").clicked() {
                        go = Some(Route::Leaderboard);
                    }
                });
            });
        });

        if let Some(route) = go {
            ctx.navigate(route);
        }
    }
}
