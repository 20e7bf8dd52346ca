use super::widgets;
use super::{Load, PageCtx, Services};
use crate::action::{ActionExecutor, ActionIntent, ActionKind, ActionOutput};
use crate::backend::{Applicant, NewProject};
use crate::data::{self, Fetched};
use crate::error::BackendError;
use crate::event::{ActionEvent, OwnerToken, PagePayload};
use crate::filter::DurationBucket;
use crate::models::{Project, ProjectType};
use crate::session::AuthState;
use eframe::egui::{self, RichText};
use tracing::info;

pub const MENTOR_OPTIONS: [&str; 3] = ["Sarah Johnson", "David Chen", "Emily Rodriguez"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrgTab {
    #[default]
    Projects,
    Applicants,
    Post,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostProjectForm {
    pub title: String,
    pub description: String,
    pub duration: DurationBucket,
    pub project_type: ProjectType,
    /// Comma separated.
    pub skills: String,
    pub mentor: usize,
}

impl Default for PostProjectForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            duration: DurationBucket::OneToTwoWeeks,
            project_type: ProjectType::Remote,
            skills: String::new(),
            mentor: 0,
        }
    }
}

impl PostProjectForm {
    /// Returns the row to insert, or the message to show.
    pub fn validate(&self, organization: &str) -> Result<NewProject, String> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err("Please enter a project title.".to_string());
        }
        let description = self.description.trim();
        if description.is_empty() {
            return Err("Please describe the project.".to_string());
        }
        let skills = self
            .skills
            .split(',')
            .map(str::trim)
            .filter(|skill| !skill.is_empty())
            .map(str::to_string)
            .collect();
        Ok(NewProject {
            title: title.to_string(),
            description: description.to_string(),
            organization: organization.to_string(),
            duration: self.duration.label().to_string(),
            project_type: self.project_type,
            skills,
            mentor: MENTOR_OPTIONS.get(self.mentor).map(|name| name.to_string()),
        })
    }
}

pub struct OrgDashboard {
    pub projects: Fetched<Vec<Project>>,
    pub applicants: Fetched<Vec<Applicant>>,
}

pub struct OrgDashboardPage {
    owner: OwnerToken,
    organization: String,
    tab: OrgTab,
    data: Load<OrgDashboard>,
    form: PostProjectForm,
    executor: ActionExecutor,
}

impl OrgDashboardPage {
    pub fn new(services: &Services, auth: &AuthState) -> Self {
        let owner = OwnerToken::next();
        let backend = services.backend.clone();
        let session = auth.session().cloned();
        let data = Load::start(services, owner, async move {
            let (projects, applicants) = tokio::join!(
                data::load_projects(backend.as_ref(), session.as_ref(), None),
                data::load_applicants(backend.as_ref(), session.as_ref()),
            );
            PagePayload::OrganizationDashboard {
                projects,
                applicants,
            }
        });
        let organization = auth
            .user()
            .and_then(|user| {
                user.metadata
                    .organization_name
                    .clone()
                    .or_else(|| user.email.clone())
            })
            .unwrap_or_else(|| "Your organization".to_string());
        Self {
            owner,
            organization,
            tab: OrgTab::default(),
            data,
            form: PostProjectForm::default(),
            executor: services.executor(owner),
        }
    }

    pub fn owner(&self) -> OwnerToken {
        self.owner
    }

    pub fn on_payload(&mut self, payload: PagePayload) {
        if let PagePayload::OrganizationDashboard {
            projects,
            applicants,
        } = payload
        {
            self.data.finish(OrgDashboard {
                projects,
                applicants,
            });
        }
    }

    pub fn on_action(&mut self, event: ActionEvent) {
        let Some(completion) = self.executor.handle(event) else {
            return;
        };
        if let Ok(ActionOutput::Posted(project)) = completion.outcome {
            info!(project_id = %project.id, "project posted");
            if let Some(dashboard) = self.data.ready_mut() {
                dashboard.projects.data_mut().insert(0, project);
            }
            if completion.current {
                self.form = PostProjectForm::default();
                self.tab = OrgTab::Projects;
            }
        }
    }

    fn post(&mut self, ctx: &PageCtx<'_>) {
        let project = match self.form.validate(&self.organization) {
            Ok(project) => project,
            Err(message) => {
                self.executor.fail_now(ActionKind::PostProject, message);
                return;
            }
        };
        let backend = ctx.services.backend.clone();
        let session = ctx.auth.session().cloned();
        let intent = ActionIntent::PostProject {
            title: project.title.clone(),
        };
        self.executor.start(intent, async move {
            let session = session.ok_or(BackendError::NoSession)?;
            backend
                .insert_project(&session, &project)
                .await
                .map(ActionOutput::Posted)
        });
    }

    fn tab_bar(&mut self, ui: &mut egui::Ui) {
        let (projects, applicants) = self
            .data
            .ready()
            .map(|d| (d.projects.data().len(), d.applicants.data().len()))
            .unwrap_or_default();
        ui.horizontal(|ui| {
            ui.selectable_value(
                &mut self.tab,
                OrgTab::Projects,
                format!("Active Projects ({projects})"),
            );
            ui.selectable_value(
                &mut self.tab,
                OrgTab::Applicants,
                format!("Applicants ({applicants})"),
            );
            ui.selectable_value(&mut self.tab, OrgTab::Post, "Post Project");
        });
        ui.separator();
    }

    fn post_form(&mut self, ui: &mut egui::Ui, ctx: &PageCtx<'_>) {
        let theme = ctx.theme;
        widgets::section_title(ui, "Post New Project");
        widgets::status_banner(ui, theme, self.executor.status(ActionKind::PostProject));
        let busy = self.executor.is_busy(ActionKind::PostProject);
        let mut submit = false;
        theme.card_frame().show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label("Project Title");
            ui.add(
                egui::TextEdit::singleline(&mut self.form.title)
                    .hint_text("Enter project title")
                    .desired_width(f32::INFINITY),
            );
            ui.label("Description");
            ui.add(
                egui::TextEdit::multiline(&mut self.form.description)
                    .hint_text("Describe the project and what students will learn")
                    .desired_rows(4)
                    .desired_width(f32::INFINITY),
            );
            ui.horizontal(|ui| {
                ui.label("Duration");
                egui::ComboBox::from_id_salt("post_duration")
                    .selected_text(self.form.duration.label())
                    .show_ui(ui, |ui| {
                        for bucket in DurationBucket::ALL {
                            ui.selectable_value(&mut self.form.duration, bucket, bucket.label());
                        }
                    });
                ui.label("Type");
                egui::ComboBox::from_id_salt("post_type")
                    .selected_text(self.form.project_type.label())
                    .show_ui(ui, |ui| {
                        for project_type in ProjectType::ALL {
                            ui.selectable_value(
                                &mut self.form.project_type,
                                project_type,
                                project_type.label(),
                            );
                        }
                    });
            });
            ui.label("Required Skills");
            ui.add(
                egui::TextEdit::singleline(&mut self.form.skills)
                    .hint_text("e.g., Marketing, Data Analysis, Design (separate with commas)")
                    .desired_width(f32::INFINITY),
            );
            ui.horizontal(|ui| {
                ui.label("Mentor");
                egui::ComboBox::from_id_salt("post_mentor")
                    .selected_text(MENTOR_OPTIONS.get(self.form.mentor).copied().unwrap_or_default())
                    .show_ui(ui, |ui| {
                        for (index, name) in MENTOR_OPTIONS.iter().enumerate() {
                            ui.selectable_value(&mut self.form.mentor, index, *name);
                        }
                    });
            });
            ui.horizontal(|ui| {
                if ui.button("Cancel").clicked() {
                    self.tab = OrgTab::Projects;
                }
                if ui.add_enabled(!busy, egui::Button::new("Post Project")).clicked() {
                    submit = true;
                }
            });
        });
        if submit {
            self.post(ctx);
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui, ctx: &mut PageCtx<'_>) {
        let theme = ctx.theme;
        widgets::page_header(
            ui,
            theme,
            "Organization Dashboard",
            "Manage your projects and connect with talented students.",
        );
        self.tab_bar(ui);

        if self.tab == OrgTab::Post {
            egui::ScrollArea::vertical().show(ui, |ui| self.post_form(ui, ctx));
            return;
        }

        let Some(dashboard) = self.data.ready() else {
            widgets::loading(ui, "Loading your projects...");
            return;
        };
        let mut open_post = false;
        egui::ScrollArea::vertical().show(ui, |ui| match self.tab {
            OrgTab::Projects => {
                ui.horizontal(|ui| {
                    widgets::section_title(ui, "Active Projects");
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("+ Post New Project").clicked() {
                            open_post = true;
                        }
                    });
                });
                widgets::status_banner(ui, theme, self.executor.status(ActionKind::PostProject));
                widgets::fallback_note(ui, theme, &dashboard.projects);
                for project in dashboard.projects.data() {
                    widgets::project_card(ui, theme, project, None);
                }
            }
            OrgTab::Applicants => {
                widgets::section_title(ui, "Recent Applicants");
                let applicants = dashboard.applicants.data();
                if applicants.is_empty() {
                    ui.label(RichText::new("No applicants yet.").color(theme.text_muted));
                }
                egui::Grid::new("applicants")
                    .striped(true)
                    .num_columns(4)
                    .show(ui, |ui| {
                        if !applicants.is_empty() {
                            for header in ["Applicant", "Project", "Status", "Applied"] {
                                ui.label(RichText::new(header).strong());
                            }
                            ui.end_row();
                        }
                        for applicant in applicants {
                            ui.vertical(|ui| {
                                ui.label(&applicant.student_name);
                                if let Some(email) = &applicant.student_email {
                                    ui.label(RichText::new(email).small().color(theme.text_muted));
                                }
                            });
                            ui.label(&applicant.application.project);
                            widgets::status_chip(ui, theme, applicant.application.status);
                            ui.label(&applicant.application.applied_date);
                            ui.end_row();
                        }
                    });
            }
            OrgTab::Post => {}
        });
        if open_post {
            self.tab = OrgTab::Post;
        }
    }
}
