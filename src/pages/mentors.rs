use super::widgets;
use super::PageCtx;
use crate::filter::search_mentors;
use crate::models::Mentor;
use crate::router::Route;
use crate::samples;
use eframe::egui::{self, RichText};

pub struct MentorsPage {
    mentors: Vec<Mentor>,
    query: String,
}

impl Default for MentorsPage {
    fn default() -> Self {
        Self {
            mentors: samples::mentors(),
            query: String::new(),
        }
    }
}

impl MentorsPage {
    pub fn show(&mut self, ui: &mut egui::Ui, ctx: &mut PageCtx<'_>) {
        let theme = ctx.theme;
        widgets::page_header(
            ui,
            theme,
            "Find a Mentor",
            "Learn from experienced professionals who guide students through real projects.",
        );
        ui.add(
            egui::TextEdit::singleline(&mut self.query)
                .hint_text("Search by name, title or expertise...")
                .desired_width(f32::INFINITY),
        );

        let mut open = None;
        egui::ScrollArea::vertical().show(ui, |ui| {
            let found = search_mentors(&self.mentors, &self.query);
            if found.is_empty() {
                ui.label(RichText::new("No mentors match your search.").color(theme.text_muted));
            }
            for mentor in found {
                theme.card_frame().show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(&mentor.name).strong().size(16.0));
                        ui.label(
                            RichText::new(format!("★ {:.1} ({} reviews)", mentor.rating, mentor.total_reviews))
                                .color(theme.gold),
                        );
                    });
                    ui.label(RichText::new(&mentor.title).color(theme.text_muted));
                    ui.label(
                        RichText::new(format!(
                            "{} • {} experience • {} mentees",
                            mentor.location, mentor.experience, mentor.total_mentees
                        ))
                        .small(),
                    );
                    widgets::skill_chips(ui, theme, &mentor.expertise);
                    if ui.button("View Profile").clicked() {
                        open = Some(mentor.id);
                    }
                });
            }
        });

        if let Some(id) = open {
            ctx.navigate(Route::Mentor(id));
        }
    }
}

pub struct MentorProfilePage {
    mentor: Option<Mentor>,
}

impl MentorProfilePage {
    pub fn new(id: u32) -> Self {
        Self {
            mentor: samples::mentor(id),
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui, ctx: &mut PageCtx<'_>) {
        let theme = ctx.theme;
        if ui.link("← Back to mentors").clicked() {
            ctx.navigate(Route::Mentors);
        }
        let Some(mentor) = &self.mentor else {
            ui.vertical_centered(|ui| {
                ui.add_space(theme.spacing_24);
                ui.heading("Mentor not found");
            });
            return;
        };

        egui::ScrollArea::vertical().show(ui, |ui| {
            theme.card_frame().show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.heading(RichText::new(&mentor.name).strong());
                ui.label(RichText::new(&mentor.title).color(theme.text_muted));
                ui.label(format!("{} • {} experience", mentor.location, mentor.experience));
                ui.label(
                    RichText::new(format!(
                        "★ {:.1} from {} reviews • {} mentees",
                        mentor.rating, mentor.total_reviews, mentor.total_mentees
                    ))
                    .color(theme.gold),
                );
            });

            ui.columns(2, |columns| {
                theme.card_frame().show(&mut columns[0], |ui| {
                    ui.set_width(ui.available_width());
                    widgets::section_title(ui, "About");
                    ui.label(&mentor.bio);
                    widgets::section_title(ui, "Expertise");
                    widgets::skill_chips(ui, theme, &mentor.expertise);
                });
                theme.card_frame().show(&mut columns[1], |ui| {
                    ui.set_width(ui.available_width());
                    widgets::section_title(ui, "Quick Stats");
                    egui::Grid::new("mentor_stats").num_columns(2).show(ui, |ui| {
                        for (label, value) in [
                            ("Response Rate", "98%"),
                            ("Avg. Response Time", "2 hours"),
                            ("Success Rate", "94%"),
                        ] {
                            ui.label(RichText::new(label).color(theme.text_muted));
                            ui.label(RichText::new(value).strong());
                            ui.end_row();
                        }
                    });
                });
            });
        });
    }
}
