use super::widgets;
use super::PageCtx;
use crate::models::{LeaderboardEntry, LeaderboardPeriod, Reward};
use crate::samples;
use eframe::egui::{self, RichText};

/// Every period shows the same standings until the backend ranks by period.
pub struct LeaderboardPage {
    period: LeaderboardPeriod,
    entries: Vec<LeaderboardEntry>,
    rewards: Vec<Reward>,
}

impl Default for LeaderboardPage {
    fn default() -> Self {
        Self {
            period: LeaderboardPeriod::default(),
            entries: samples::leaderboard(),
            rewards: samples::rewards(),
        }
    }
}

impl LeaderboardPage {
    pub fn show(&mut self, ui: &mut egui::Ui, ctx: &mut PageCtx<'_>) {
        let theme = ctx.theme;
        widgets::page_header(
            ui,
            theme,
            "Leaderboard",
            "Top students ranked by completed projects and points earned.",
        );

        widgets::section_title(ui, "Rewards");
        ui.horizontal_wrapped(|ui| {
            for reward in &self.rewards {
                theme.card_frame().show(ui, |ui| {
                    ui.label(RichText::new(&reward.name).strong());
                    ui.label(RichText::new(&reward.kind).small().color(theme.text_muted));
                });
            }
        });

        ui.add_space(theme.spacing_8);
        widgets::section_title(ui, "Rankings");
        ui.horizontal(|ui| {
            for period in LeaderboardPeriod::ALL {
                ui.selectable_value(&mut self.period, period, period.label());
            }
        });

        egui::ScrollArea::vertical().show(ui, |ui| {
            egui::Grid::new("leaderboard")
                .striped(true)
                .num_columns(4)
                .min_col_width(80.0)
                .show(ui, |ui| {
                    for header in ["Rank", "Student", "Projects", "Points"] {
                        ui.label(RichText::new(header).strong());
                    }
                    ui.end_row();
                    for entry in &self.entries {
                        match entry.badge {
                            Some(badge) => ui.label(
                                RichText::new(format!("🏅 {}", entry.rank))
                                    .strong()
                                    .color(theme.badge_color(badge)),
                            ),
                            None => ui.label(format!("#{}", entry.rank)),
                        };
                        ui.label(&entry.name);
                        ui.label(entry.projects.to_string());
                        ui.label(RichText::new(entry.points.to_string()).color(theme.accent_primary));
                        ui.end_row();
                    }
                });
        });
    }
}
