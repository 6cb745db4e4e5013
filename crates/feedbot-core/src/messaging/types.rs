use crate::domain::{ChannelId, GuildId, MessageRef, UserId};

/// Who sent a message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Author {
    pub id: UserId,
    /// Account handle (`name` on Discord).
    pub username: String,
    /// Server nickname or global display name, falling back to the handle.
    pub display_name: String,
    pub avatar_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub url: String,
}

/// Platform-agnostic incoming message, alive for the duration of one event.
#[derive(Clone, Debug)]
pub struct IncomingMessage {
    pub message: MessageRef,
    pub author: Author,
    /// `None` for direct messages.
    pub guild_id: Option<GuildId>,
    pub content: String,
    pub attachments: Vec<Attachment>,
}

impl IncomingMessage {
    pub fn channel_id(&self) -> ChannelId {
        self.message.channel_id
    }

    pub fn is_direct(&self) -> bool {
        self.guild_id.is_none()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardField {
    pub name: String,
    pub value: String,
}

/// Structured, formatted message (an embed on Discord).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SuggestionCard {
    pub title: String,
    pub description: String,
    pub color: u32,
    pub fields: Vec<CardField>,
    pub thumbnail_url: Option<String>,
}

impl SuggestionCard {
    pub fn field(&self, name: &str) -> Option<&CardField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// First field whose value is longer than `limit` characters.
    pub fn oversized_field(&self, limit: usize) -> Option<&CardField> {
        self.fields.iter().find(|f| f.value.chars().count() > limit)
    }
}

/// Capabilities / limits of a chat implementation.
#[derive(Clone, Copy, Debug)]
pub struct ChatCapabilities {
    /// Longest plain text or direct message, in characters.
    pub max_message_len: usize,
    pub max_field_len: usize,
}
