use super::widgets;
use super::{Load, PageCtx, Services};
use crate::action::{ActionKind, ProjectActions};
use crate::data::{self, Fetched};
use crate::event::{ActionEvent, OwnerToken, PagePayload};
use crate::models::Project;
use crate::router::Route;
use crate::session::AuthState;
use eframe::egui::{self, RichText};

pub struct ProjectDetailPage {
    owner: OwnerToken,
    project: Load<Fetched<Option<Project>>>,
    actions: ProjectActions,
}

impl ProjectDetailPage {
    pub fn new(services: &Services, auth: &AuthState, id: &str) -> Self {
        let owner = OwnerToken::next();
        let backend = services.backend.clone();
        let session = auth.session().cloned();
        let id = id.to_string();
        let project = Load::start(services, owner, async move {
            PagePayload::Project(data::load_project(backend.as_ref(), session.as_ref(), &id).await)
        });
        Self {
            owner,
            project,
            actions: services.project_actions(owner, auth),
        }
    }

    pub fn owner(&self) -> OwnerToken {
        self.owner
    }

    pub fn on_payload(&mut self, payload: PagePayload) {
        match payload {
            PagePayload::Project(project) => self.project.finish(project),
            PagePayload::AppliedProjects(ids) => self.actions.restore_applied(ids),
            _ => {}
        }
    }

    pub fn on_action(&mut self, event: ActionEvent) {
        self.actions.handle(event);
    }

    pub fn show(&mut self, ui: &mut egui::Ui, ctx: &mut PageCtx<'_>) {
        let theme = ctx.theme;
        if ui.link("← Back to projects").clicked() {
            ctx.navigate(Route::Projects);
        }

        let Some(fetched) = self.project.ready() else {
            widgets::loading(ui, "Loading project...");
            return;
        };
        let Some(project) = fetched.data() else {
            ui.add_space(theme.spacing_24);
            ui.vertical_centered(|ui| {
                ui.heading("Project not found");
                ui.label(
                    RichText::new("It may have been removed or the link is wrong.")
                        .color(theme.text_muted),
                );
            });
            return;
        };
        widgets::fallback_note(ui, theme, fetched);

        let mut clicked = None;
        egui::ScrollArea::vertical().show(ui, |ui| {
            theme.card_frame().show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.heading(RichText::new(&project.title).strong());
                ui.label(RichText::new(&project.organization).color(theme.text_muted));
                ui.horizontal_wrapped(|ui| {
                    widgets::chip(
                        ui,
                        theme,
                        project.project_type.label(),
                        theme.surface_2,
                        theme.text_muted,
                    );
                    ui.label(format!("⏱ {}", project.duration));
                    ui.label(format!("{} applications", project.applications));
                    if !project.posted_date.is_empty() {
                        ui.label(format!("Posted {}", project.posted_date));
                    }
                });
                ui.add_space(theme.spacing_8);
                widgets::section_title(ui, "About this project");
                ui.label(&project.description);
                widgets::section_title(ui, "Skills");
                widgets::skill_chips(ui, theme, &project.skills);
                if let Some(mentor) = &project.mentor {
                    widgets::section_title(ui, "Mentor");
                    ui.label(mentor);
                }
                ui.add_space(theme.spacing_8);
                widgets::status_banner(ui, theme, self.actions.status(ActionKind::Apply));
                widgets::status_banner(ui, theme, self.actions.status(ActionKind::Save));
                ui.horizontal(|ui| {
                    clicked = widgets::project_controls(ui, project, &self.actions);
                });
            });
        });

        let project = project.clone();
        let live = fetched.is_live();
        match clicked {
            Some(widgets::CardClick::Apply) => {
                let remote = ctx.services.remote_apply(ctx.auth, live);
                self.actions.apply(&project, remote);
            }
            Some(widgets::CardClick::ToggleSave) => {
                self.actions.toggle_save(&project);
            }
            Some(widgets::CardClick::Details) | None => {}
        }
    }
}
