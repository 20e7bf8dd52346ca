//! Inbox state for the messages page: one selected conversation at a time,
//! its thread loaded wholesale on selection, sends appended locally.

use crate::models::{Conversation, Message, ParticipantType};
use crate::samples;

pub const JUST_NOW: &str = "Just now";

#[derive(Debug, Clone)]
pub struct ConversationPanel {
    conversations: Vec<Conversation>,
    selected: Option<u32>,
    messages: Vec<Message>,
    sender_type: ParticipantType,
    pub draft: String,
    pub search: String,
}

impl ConversationPanel {
    pub fn new(conversations: Vec<Conversation>, sender_type: ParticipantType) -> Self {
        Self {
            conversations,
            selected: None,
            messages: Vec::new(),
            sender_type,
            draft: String::new(),
            search: String::new(),
        }
    }

    #[cfg(test)]
    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn selected(&self) -> Option<&Conversation> {
        let id = self.selected?;
        self.conversations.iter().find(|conversation| conversation.id == id)
    }

    pub fn total_unread(&self) -> u32 {
        self.conversations
            .iter()
            .map(|conversation| conversation.unread_count)
            .sum()
    }

    /// Opens `id`, replacing the visible thread and clearing only its unread count.
    pub fn select(&mut self, id: u32) -> bool {
        let Some(conversation) = self
            .conversations
            .iter_mut()
            .find(|conversation| conversation.id == id)
        else {
            return false;
        };
        conversation.unread_count = 0;
        self.selected = Some(id);
        self.messages = samples::thread();
        true
    }

    /// Appends the trimmed draft to the open thread. Blank drafts and an
    /// empty selection change nothing.
    pub fn send(&mut self) -> Option<&Message> {
        let content = self.draft.trim();
        if content.is_empty() {
            return None;
        }
        let selected = self.selected?;
        let content = content.to_string();

        let id = self
            .messages
            .iter()
            .map(|message| message.id)
            .max()
            .unwrap_or(0)
            + 1;
        self.messages.push(Message {
            id,
            sender_id: samples::CURRENT_USER_ID.to_string(),
            sender_name: "You".to_string(),
            sender_type: self.sender_type,
            content: content.clone(),
            timestamp: JUST_NOW.to_string(),
            read: true,
        });
        self.draft.clear();

        if let Some(conversation) = self
            .conversations
            .iter_mut()
            .find(|conversation| conversation.id == selected)
        {
            conversation.last_message = content;
            conversation.last_message_time = JUST_NOW.to_string();
        }
        self.messages.last()
    }

    pub fn visible(&self) -> Vec<&Conversation> {
        search_conversations(&self.conversations, &self.search)
    }
}

/// Case-insensitive match on participant name or last message.
pub fn search_conversations<'a>(conversations: &'a [Conversation], query: &str) -> Vec<&'a Conversation> {
    let query = query.to_lowercase();
    conversations
        .iter()
        .filter(|conversation| {
            conversation.participant_name.to_lowercase().contains(&query)
                || conversation.last_message.to_lowercase().contains(&query)
        })
        .collect()
}
