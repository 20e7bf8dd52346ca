use super::widgets;
use super::{Load, PageCtx, Services};
use crate::data::{self, Fetched};
use crate::event::{OwnerToken, PagePayload};
use crate::filter::ApplicationFilter;
use crate::models::{Application, ApplicationStatus};
use crate::router::Route;
use crate::session::AuthState;
use eframe::egui::{self, RichText};

pub struct ApplicationsPage {
    owner: OwnerToken,
    applications: Load<Fetched<Vec<Application>>>,
    filter: ApplicationFilter,
}

/// Headline counts above the list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplicationStats {
    pub total: usize,
    pub under_review: usize,
    pub accepted: usize,
    pub interviews: usize,
}

impl ApplicationStats {
    pub fn of(applications: &[Application]) -> Self {
        let count = |status| applications.iter().filter(|a| a.status == status).count();
        Self {
            total: applications.len(),
            under_review: count(ApplicationStatus::UnderReview),
            accepted: count(ApplicationStatus::Accepted),
            interviews: count(ApplicationStatus::InterviewScheduled),
        }
    }
}

impl ApplicationsPage {
    pub fn new(services: &Services, auth: &AuthState) -> Self {
        let owner = OwnerToken::next();
        let backend = services.backend.clone();
        let session = auth.session().cloned();
        let applications = Load::start(services, owner, async move {
            PagePayload::Applications(
                data::load_applications(backend.as_ref(), session.as_ref(), None).await,
            )
        });
        Self {
            owner,
            applications,
            filter: ApplicationFilter::default(),
        }
    }

    pub fn owner(&self) -> OwnerToken {
        self.owner
    }

    pub fn on_payload(&mut self, payload: PagePayload) {
        if let PagePayload::Applications(applications) = payload {
            self.applications.finish(applications);
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui, ctx: &mut PageCtx<'_>) {
        let theme = ctx.theme;
        widgets::page_header(
            ui,
            theme,
            "My Applications",
            "Track the status of your project applications and manage your opportunities.",
        );

        let Some(applications) = self.applications.ready() else {
            widgets::loading(ui, "Loading applications...");
            return;
        };
        widgets::fallback_note(ui, theme, applications);

        let stats = ApplicationStats::of(applications.data());
        ui.columns(4, |columns| {
            let cells = [
                ("Total Applications", stats.total),
                ("Under Review", stats.under_review),
                ("Accepted", stats.accepted),
                ("Interviews", stats.interviews),
            ];
            for (column, (label, value)) in columns.iter_mut().zip(cells) {
                theme.card_frame().show(column, |ui| {
                    ui.set_width(ui.available_width());
                    ui.label(RichText::new(value.to_string()).size(24.0).strong());
                    ui.label(RichText::new(label).color(theme.text_muted));
                });
            }
        });

        ui.horizontal(|ui| {
            ui.add(
                egui::TextEdit::singleline(&mut self.filter.query)
                    .hint_text("Search applications...")
                    .desired_width(320.0),
            );
            let selected = self
                .filter
                .status
                .map(ApplicationStatus::label)
                .unwrap_or("All Status");
            egui::ComboBox::from_id_salt("application_status")
                .selected_text(selected)
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut self.filter.status, None, "All Status");
                    for status in ApplicationStatus::ALL {
                        ui.selectable_value(&mut self.filter.status, Some(status), status.label());
                    }
                });
        });

        let visible = self.filter.apply(applications.data());
        let mut go: Option<Route> = None;
        egui::ScrollArea::vertical().show(ui, |ui| {
            if visible.is_empty() {
                ui.vertical_centered(|ui| {
                    ui.add_space(theme.spacing_24);
                    ui.label(RichText::new("No applications found").strong());
                    if ui.button("Browse Projects").clicked() {
                        go = Some(Route::Projects);
                    }
                });
            }
            for application in visible {
                theme.card_frame().show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(&application.project).strong().size(16.0));
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            widgets::status_chip(ui, theme, application.status);
                        });
                    });
                    ui.label(RichText::new(&application.organization).color(theme.text_muted));
                    ui.label(&application.description);
                    ui.horizontal_wrapped(|ui| {
                        ui.label(RichText::new(format!("Applied {}", application.applied_date)).small());
                        ui.label(RichText::new("•").small());
                        ui.label(RichText::new(&application.duration).small());
                        ui.label(RichText::new("•").small());
                        ui.label(RichText::new(application.project_type.label()).small());
                        if let Some(mentor) = &application.mentor {
                            ui.label(RichText::new("•").small());
                            ui.label(RichText::new(format!("Mentor: {mentor}")).small());
                        }
                    });
                    widgets::skill_chips(ui, theme, &application.skills);
                    if let Some(project_id) = &application.project_id {
                        if ui.button("View Project").clicked() {
                            go = Some(Route::ProjectDetail(project_id.clone()));
                        }
                    }
                });
            }
        });

        if let Some(route) = go {
            ctx.navigate(route);
        }
    }
}
