use super::widgets;
use super::PageCtx;
use crate::router::Route;
use eframe::egui::{self, RichText};

const FEATURES: [(&str, &str); 3] = [
    (
        "Students",
        "Gain real-world experience through short, skill-focused projects with mentor guidance.",
    ),
    (
        "Organizations",
        "Get fresh perspectives on real problems from motivated students.",
    ),
    (
        "Connect",
        "Build lasting relationships between learners, mentors and organizations.",
    ),
];

const IMPACT: [(&str, &str); 3] = [
    ("500+", "Students"),
    ("120+", "Organizations"),
    ("850+", "Projects completed"),
];

pub struct LandingPage;

impl LandingPage {
    pub fn show(&mut self, ui: &mut egui::Ui, ctx: &mut PageCtx<'_>) {
        let theme = ctx.theme;
        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(theme.spacing_24 * 2.0);
                ui.label(
                    RichText::new("Bridge the gap between learning and doing")
                        .size(32.0)
                        .strong(),
                );
                ui.label(
                    RichText::new(
                        "SkillBridge connects students with organizations for micro-internships and mentorships.",
                    )
                    .color(theme.text_muted),
                );
                ui.add_space(theme.spacing_16);
                ui.horizontal(|ui| {
                    if ui.button("Browse Projects").clicked() {
                        ctx.navigate(Route::Projects);
                    }
                    if ui.button("Get Started").clicked() {
                        ctx.navigate(Route::Signup);
                    }
                    if ui.button("Log In").clicked() {
                        ctx.navigate(Route::Login);
                    }
                });
                ui.add_space(theme.spacing_24);
            });

            ui.columns(FEATURES.len(), |columns| {
                for (column, (title, body)) in columns.iter_mut().zip(FEATURES) {
                    theme.card_frame().show(column, |ui| {
                        ui.set_width(ui.available_width());
                        widgets::section_title(ui, title);
                        ui.label(RichText::new(body).color(theme.text_muted));
                    });
                }
            });

            ui.add_space(theme.spacing_24);
            ui.vertical_centered(|ui| widgets::section_title(ui, "Our Impact"));
            ui.columns(IMPACT.len(), |columns| {
                for (column, (figure, label)) in columns.iter_mut().zip(IMPACT) {
                    column.vertical_centered(|ui| {
                        ui.label(RichText::new(figure).size(28.0).strong().color(theme.accent_primary));
                        ui.label(label);
                    });
                }
            });

            ui.add_space(theme.spacing_24);
            ui.vertical_centered(|ui| {
                ui.label(
                    RichText::new("© 2025 SkillBridge. All rights reserved.")
                        .small()
                        .color(theme.text_muted),
                );
            });
        });
    }
}
