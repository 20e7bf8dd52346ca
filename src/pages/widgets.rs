//! Small drawing helpers shared by several pages.

use crate::action::{ActionKind, ActionStatus, Phase, ProjectActions};
use crate::data::{FallbackReason, Fetched};
use crate::models::{ApplicationStatus, Project};
use crate::theme::Theme;
use eframe::egui::{self, Color32, RichText};

pub fn page_header(ui: &mut egui::Ui, theme: &Theme, title: &str, subtitle: &str) {
    ui.heading(RichText::new(title).strong());
    if !subtitle.is_empty() {
        ui.label(RichText::new(subtitle).color(theme.text_muted));
    }
    ui.add_space(theme.spacing_8);
}

pub fn section_title(ui: &mut egui::Ui, title: &str) {
    ui.label(RichText::new(title).text_style(egui::TextStyle::Name("section".into())).strong());
}

pub fn loading(ui: &mut egui::Ui, label: &str) {
    ui.vertical_centered(|ui| {
        ui.add_space(48.0);
        ui.spinner();
        ui.label(label);
    });
}

pub fn chip(ui: &mut egui::Ui, theme: &Theme, text: &str, fill: Color32, color: Color32) {
    theme.chip_frame(fill).show(ui, |ui| {
        ui.label(RichText::new(text).small().color(color));
    });
}

pub fn skill_chips(ui: &mut egui::Ui, theme: &Theme, skills: &[String]) {
    ui.horizontal_wrapped(|ui| {
        for skill in skills {
            chip(ui, theme, skill, theme.accent_soft, theme.accent_muted);
        }
    });
}

pub fn status_chip(ui: &mut egui::Ui, theme: &Theme, status: ApplicationStatus) {
    let (fill, color) = theme.application_status_colors(status);
    chip(ui, theme, status.label(), fill, color);
}

/// Inline banner for one status slot; draws nothing while idle.
pub fn status_banner(ui: &mut egui::Ui, theme: &Theme, status: &ActionStatus) {
    if status.is_idle() {
        return;
    }
    let (fill, color) = theme.phase_colors(status.phase());
    theme.chip_frame(fill).show(ui, |ui| {
        ui.horizontal(|ui| {
            if status.phase() == Phase::InProgress {
                ui.spinner();
            }
            ui.label(RichText::new(status.message()).color(color));
        });
    });
}

pub fn fallback_note<T>(ui: &mut egui::Ui, theme: &Theme, fetched: &Fetched<T>) {
    let note = match fetched.reason() {
        None => return,
        Some(FallbackReason::NotConnected) => "Showing sample data.",
        Some(FallbackReason::Empty) => "Nothing here yet, showing sample data.",
        Some(FallbackReason::Failed(_)) => "Could not reach the server, showing sample data.",
    };
    ui.label(RichText::new(note).small().italics().color(theme.text_muted));
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardClick {
    Apply,
    ToggleSave,
    Details,
}

/// Apply and save controls for one project, following `actions`.
pub fn project_controls(
    ui: &mut egui::Ui,
    project: &Project,
    actions: &ProjectActions,
) -> Option<CardClick> {
    let mut clicked = None;
    let applying = actions
        .status(ActionKind::Apply)
        .is_in_progress_for(&project.id);
    let saving = actions.is_saving(&project.id);

    if actions.is_applied(&project.id) {
        ui.add_enabled(false, egui::Button::new("Applied"));
    } else if applying {
        ui.add_enabled(false, egui::Button::new("Applying..."));
    } else if actions.is_checking_applied() {
        ui.add_enabled(false, egui::Button::new("Checking..."));
    } else if ui
        .add_enabled(actions.can_apply(&project.id), egui::Button::new("Apply Now"))
        .clicked()
    {
        clicked = Some(CardClick::Apply);
    }

    let save_label = match (saving, actions.is_saved(&project.id)) {
        (true, _) => "Saving...",
        (false, true) => "Saved",
        (false, false) => "Save",
    };
    if ui
        .add_enabled(actions.can_toggle_save(&project.id), egui::Button::new(save_label))
        .clicked()
    {
        clicked = Some(CardClick::ToggleSave);
    }
    clicked
}

pub fn project_card(
    ui: &mut egui::Ui,
    theme: &Theme,
    project: &Project,
    actions: Option<&ProjectActions>,
) -> Option<CardClick> {
    let mut clicked = None;
    theme.card_frame().show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.horizontal(|ui| {
            ui.label(RichText::new(&project.title).strong().size(16.0));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                chip(
                    ui,
                    theme,
                    project.project_type.label(),
                    theme.surface_2,
                    theme.text_muted,
                );
            });
        });
        ui.label(RichText::new(&project.organization).color(theme.text_muted));
        ui.label(&project.description);
        ui.horizontal_wrapped(|ui| {
            ui.label(RichText::new(format!("⏱ {}", project.duration)).small());
            if let Some(mentor) = &project.mentor {
                ui.label(RichText::new(format!("Mentor: {mentor}")).small());
            }
            ui.label(RichText::new(format!("{} applications", project.applications)).small());
            if !project.posted_date.is_empty() {
                ui.label(
                    RichText::new(format!("Posted {}", project.posted_date))
                        .small()
                        .color(theme.text_muted),
                );
            }
        });
        skill_chips(ui, theme, &project.skills);
        ui.horizontal(|ui| {
            if let Some(actions) = actions {
                clicked = project_controls(ui, project, actions);
            }
            if ui.button("View Details").clicked() {
                clicked = Some(CardClick::Details);
            }
        });
    });
    clicked
}
