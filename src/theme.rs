use crate::action::Phase;
use crate::models::{ApplicationStatus, Badge, ParticipantType};
use eframe::egui::{self, Color32, CornerRadius, FontId, Frame, Margin, Stroke, TextStyle};

#[derive(Debug, Clone)]
pub struct Theme {
    pub surface_0: Color32,
    pub surface_1: Color32,
    pub surface_2: Color32,
    pub surface_3: Color32,
    pub accent_primary: Color32,
    pub accent_muted: Color32,
    pub accent_soft: Color32,
    pub success: Color32,
    pub success_soft: Color32,
    pub warning: Color32,
    pub warning_soft: Color32,
    pub danger: Color32,
    pub danger_soft: Color32,
    pub info_soft: Color32,
    pub text_primary: Color32,
    pub text_muted: Color32,
    pub text_on_accent: Color32,
    pub border_subtle: Color32,
    pub gold: Color32,
    pub silver: Color32,
    pub bronze: Color32,
    pub spacing_8: f32,
    pub spacing_12: f32,
    pub spacing_16: f32,
    pub spacing_24: f32,
    pub radius_8: u8,
    pub radius_12: u8,
    pub sidebar_width: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            surface_0: Color32::from_rgb(0xF9, 0xFA, 0xFB),
            surface_1: Color32::from_rgb(0xFF, 0xFF, 0xFF),
            surface_2: Color32::from_rgb(0xF3, 0xF4, 0xF6),
            surface_3: Color32::from_rgb(0xE5, 0xE7, 0xEB),
            accent_primary: Color32::from_rgb(0x25, 0x63, 0xEB),
            accent_muted: Color32::from_rgb(0x1D, 0x4E, 0xD8),
            accent_soft: Color32::from_rgb(0xDB, 0xEA, 0xFE),
            success: Color32::from_rgb(0x16, 0xA3, 0x4A),
            success_soft: Color32::from_rgb(0xDC, 0xFC, 0xE7),
            warning: Color32::from_rgb(0xCA, 0x8A, 0x04),
            warning_soft: Color32::from_rgb(0xFE, 0xF9, 0xC3),
            danger: Color32::from_rgb(0xDC, 0x26, 0x26),
            danger_soft: Color32::from_rgb(0xFE, 0xE2, 0xE2),
            info_soft: Color32::from_rgb(0xE0, 0xF2, 0xFE),
            text_primary: Color32::from_rgb(0x11, 0x18, 0x27),
            text_muted: Color32::from_rgb(0x6B, 0x72, 0x80),
            text_on_accent: Color32::WHITE,
            border_subtle: Color32::from_rgb(0xE5, 0xE7, 0xEB),
            gold: Color32::from_rgb(0xEA, 0xB3, 0x08),
            silver: Color32::from_rgb(0x9C, 0xA3, 0xAF),
            bronze: Color32::from_rgb(0xB4, 0x53, 0x09),
            spacing_8: Self::P8,
            spacing_12: Self::P12,
            spacing_16: Self::P16,
            spacing_24: Self::P24,
            radius_8: Self::R8,
            radius_12: Self::R12,
            sidebar_width: 220.0,
        }
    }
}

impl Theme {
    pub const R8: u8 = 8;
    pub const R12: u8 = 12;
    pub const P8: f32 = 8.0;
    pub const P12: f32 = 12.0;
    pub const P16: f32 = 16.0;
    pub const P24: f32 = 24.0;

    pub fn apply_visuals(&self, ctx: &egui::Context) {
        let mut visuals = egui::Visuals::light();
        visuals.panel_fill = self.surface_0;
        visuals.override_text_color = Some(self.text_primary);
        visuals.widgets.noninteractive.fg_stroke.color = self.text_primary;
        visuals.widgets.noninteractive.bg_fill = self.surface_1;
        visuals.widgets.noninteractive.weak_bg_fill = self.surface_1;
        visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, self.border_subtle);
        visuals.widgets.inactive.bg_fill = self.surface_2;
        visuals.widgets.inactive.weak_bg_fill = self.surface_2;
        visuals.widgets.inactive.fg_stroke.color = self.text_primary;
        visuals.widgets.inactive.bg_stroke = Stroke::NONE;
        visuals.widgets.hovered.bg_fill = self.surface_3;
        visuals.widgets.hovered.weak_bg_fill = self.surface_3;
        visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, self.accent_soft);
        visuals.widgets.hovered.fg_stroke.color = self.text_primary;
        visuals.widgets.active.bg_fill = self.accent_muted;
        visuals.widgets.active.bg_stroke = Stroke::NONE;
        visuals.widgets.active.fg_stroke.color = self.text_on_accent;
        visuals.widgets.open.bg_fill = self.surface_3;
        visuals.widgets.open.bg_stroke = Stroke::NONE;
        visuals.selection.bg_fill = self.accent_soft;
        visuals.selection.stroke = Stroke::new(1.0, self.accent_primary);
        visuals.hyperlink_color = self.accent_primary;
        visuals.extreme_bg_color = self.surface_1;
        visuals.window_fill = self.surface_1;
        visuals.window_stroke = Stroke::new(1.0, self.border_subtle);
        visuals.window_corner_radius = CornerRadius::same(self.radius_12);
        visuals.window_shadow = egui::epaint::Shadow {
            offset: [0, 8],
            blur: 24,
            spread: 0,
            color: Color32::from_rgba_premultiplied(0, 0, 0, 24),
        };
        let mut style = (*ctx.style()).clone();
        style.visuals = visuals;
        style.spacing.item_spacing = egui::vec2(10.0, 10.0);
        style.spacing.button_padding = egui::vec2(12.0, 6.0);
        style.text_styles.insert(TextStyle::Heading, FontId::proportional(22.0));
        style.text_styles.insert(TextStyle::Name("section".into()), FontId::proportional(16.0));
        style.text_styles.insert(TextStyle::Body, FontId::proportional(14.0));
        style.text_styles.insert(TextStyle::Monospace, FontId::monospace(13.0));
        style.text_styles.insert(TextStyle::Small, FontId::proportional(12.0));
        ctx.set_style(style);
    }

    pub fn panel_frame(&self, fill: Color32, inner_padding: i8) -> Frame {
        Frame::new()
            .fill(fill)
            .inner_margin(Margin::same(inner_padding))
            .corner_radius(CornerRadius::same(self.radius_12))
            .stroke(Stroke::new(1.0, self.border_subtle))
            .shadow(egui::epaint::Shadow {
                offset: [0, 2],
                blur: 8,
                spread: 0,
                color: Color32::from_rgba_premultiplied(0, 0, 0, 12),
            })
    }

    pub fn card_frame(&self) -> Frame {
        self.panel_frame(self.surface_1, self.spacing_16 as i8)
    }

    pub fn composer_frame(&self) -> Frame {
        Frame::new()
            .fill(self.surface_1)
            .inner_margin(Margin::symmetric(self.spacing_12 as i8, 10))
            .corner_radius(CornerRadius::same(self.radius_12))
            .stroke(Stroke::new(1.0, self.border_subtle))
    }

    pub fn chip_frame(&self, fill: Color32) -> Frame {
        Frame::new()
            .fill(fill)
            .inner_margin(Margin::symmetric(8, 2))
            .corner_radius(CornerRadius::same(self.radius_8))
    }

    /// (background, text) for an action status banner.
    pub fn phase_colors(&self, phase: Phase) -> (Color32, Color32) {
        match phase {
            Phase::Idle => (self.surface_2, self.text_muted),
            Phase::InProgress => (self.info_soft, self.accent_muted),
            Phase::Succeeded => (self.success_soft, self.success),
            Phase::Failed => (self.danger_soft, self.danger),
        }
    }

    pub fn application_status_colors(&self, status: ApplicationStatus) -> (Color32, Color32) {
        match status {
            ApplicationStatus::UnderReview => (self.warning_soft, self.warning),
            ApplicationStatus::Accepted => (self.success_soft, self.success),
            ApplicationStatus::Rejected => (self.danger_soft, self.danger),
            ApplicationStatus::InterviewScheduled => (self.accent_soft, self.accent_muted),
        }
    }

    pub fn participant_color(&self, participant: ParticipantType) -> Color32 {
        match participant {
            ParticipantType::Student => self.accent_primary,
            ParticipantType::Organization => self.success,
            ParticipantType::Mentor => self.warning,
        }
    }

    pub fn badge_color(&self, badge: Badge) -> Color32 {
        match badge {
            Badge::Gold => self.gold,
            Badge::Silver => self.silver,
            Badge::Bronze => self.bronze,
        }
    }
}
