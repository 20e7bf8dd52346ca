use super::widgets;
use super::{Load, PageCtx, Services};
use crate::data;
use crate::event::{OwnerToken, PagePayload};
use crate::messages::ConversationPanel;
use crate::models::ParticipantType;
use crate::session::AuthState;
use crate::theme::Theme;
use eframe::egui::{self, RichText};

pub struct MessagesPage {
    owner: OwnerToken,
    sender_type: ParticipantType,
    panel: Load<ConversationPanel>,
}

impl MessagesPage {
    pub fn new(services: &Services, auth: &AuthState) -> Self {
        let owner = OwnerToken::next();
        let panel = Load::start(services, owner, async {
            PagePayload::Conversations(data::load_conversations().await)
        });
        Self {
            owner,
            sender_type: auth
                .role()
                .map(ParticipantType::from)
                .unwrap_or(ParticipantType::Student),
            panel,
        }
    }

    pub fn owner(&self) -> OwnerToken {
        self.owner
    }

    pub fn total_unread(&self) -> Option<u32> {
        self.panel.ready().map(ConversationPanel::total_unread)
    }

    pub fn on_payload(&mut self, payload: PagePayload) {
        if let PagePayload::Conversations(conversations) = payload {
            self.panel
                .finish(ConversationPanel::new(conversations.into_data(), self.sender_type));
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui, ctx: &mut PageCtx<'_>) {
        let theme = ctx.theme;
        let Some(panel) = self.panel.ready_mut() else {
            widgets::loading(ui, "Loading conversations...");
            return;
        };

        egui::SidePanel::left("conversation_list")
            .resizable(true)
            .default_width(300.0)
            .show_inside(ui, |ui| conversation_list(ui, theme, panel));

        egui::CentralPanel::default().show_inside(ui, |ui| thread(ui, theme, panel));
    }
}

fn conversation_list(ui: &mut egui::Ui, theme: &Theme, panel: &mut ConversationPanel) {
    widgets::section_title(ui, "Messages");
    ui.add(
        egui::TextEdit::singleline(&mut panel.search)
            .hint_text("Search conversations...")
            .desired_width(f32::INFINITY),
    );

    let selected_id = panel.selected().map(|c| c.id);
    let mut clicked = None;
    egui::ScrollArea::vertical()
        .id_salt("conversations")
        .show(ui, |ui| {
            for conversation in panel.visible() {
                let fill = if Some(conversation.id) == selected_id {
                    theme.accent_soft
                } else {
                    theme.surface_1
                };
                let response = theme
                    .panel_frame(fill, theme.spacing_8 as i8)
                    .show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        ui.horizontal(|ui| {
                            let dot = if conversation.online { "●" } else { "○" };
                            ui.label(RichText::new(dot).color(if conversation.online {
                                theme.success
                            } else {
                                theme.text_muted
                            }));
                            ui.label(RichText::new(&conversation.participant_name).strong().color(
                                theme.participant_color(conversation.participant_type),
                            ));
                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                if conversation.unread_count > 0 {
                                    widgets::chip(
                                        ui,
                                        theme,
                                        &conversation.unread_count.to_string(),
                                        theme.accent_primary,
                                        theme.text_on_accent,
                                    );
                                }
                                ui.label(
                                    RichText::new(&conversation.last_message_time)
                                        .small()
                                        .color(theme.text_muted),
                                );
                            });
                        });
                        if let Some(context) = &conversation.project_context {
                            ui.label(RichText::new(context).small().color(theme.accent_muted));
                        }
                        ui.label(
                            RichText::new(&conversation.last_message)
                                .small()
                                .color(theme.text_muted),
                        );
                    })
                    .response
                    .interact(egui::Sense::click());
                if response.clicked() {
                    clicked = Some(conversation.id);
                }
            }
        });

    if let Some(id) = clicked {
        panel.select(id);
    }
}

fn thread(ui: &mut egui::Ui, theme: &Theme, panel: &mut ConversationPanel) {
    let Some(conversation) = panel.selected() else {
        ui.vertical_centered(|ui| {
            ui.add_space(theme.spacing_24 * 2.0);
            ui.label(RichText::new("Select a conversation").strong());
            ui.label(
                RichText::new("Choose a conversation from the list to start messaging.")
                    .color(theme.text_muted),
            );
        });
        return;
    };

    ui.horizontal(|ui| {
        ui.label(RichText::new(&conversation.participant_name).strong().size(16.0));
        let presence = if conversation.online { "Online" } else { "Offline" };
        ui.label(RichText::new(presence).small().color(theme.text_muted));
    });
    if let Some(context) = &conversation.project_context {
        ui.label(RichText::new(format!("Re: {context}")).small().color(theme.text_muted));
    }
    ui.separator();

    let transcript_height = (ui.available_height() - 70.0).max(120.0);
    egui::ScrollArea::vertical()
        .id_salt("message_thread")
        .max_height(transcript_height)
        .stick_to_bottom(true)
        .show(ui, |ui| {
            for message in panel.messages() {
                let mine = message.sender_id == crate::samples::CURRENT_USER_ID;
                let layout = if mine {
                    egui::Layout::right_to_left(egui::Align::TOP)
                } else {
                    egui::Layout::left_to_right(egui::Align::TOP)
                };
                ui.with_layout(layout, |ui| {
                    let fill = if mine { theme.accent_soft } else { theme.surface_2 };
                    theme.chip_frame(fill).show(ui, |ui| {
                        ui.set_max_width(420.0);
                        ui.vertical(|ui| {
                            ui.label(&message.content);
                            ui.label(
                                RichText::new(&message.timestamp)
                                    .small()
                                    .color(theme.text_muted),
                            );
                        });
                    });
                });
            }
        });

    theme.composer_frame().show(ui, |ui| {
        ui.horizontal(|ui| {
            let response = ui.add(
                egui::TextEdit::singleline(&mut panel.draft)
                    .hint_text("Type your message...")
                    .desired_width(ui.available_width() - 80.0),
            );
            let enter = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            let clicked = ui
                .add_enabled(!panel.draft.trim().is_empty(), egui::Button::new("Send"))
                .clicked();
            if (enter || clicked) && panel.send().is_some() {
                response.request_focus();
            }
        });
    });
}
