//! Discord adapter (serenity).
//!
//! This crate implements the `feedbot-core` ChatPort over the Discord HTTP API
//! and feeds gateway events into the core bot.

use std::sync::Arc;

use async_trait::async_trait;

use serenity::{
    builder::{CreateEmbed, CreateMessage},
    http::Http,
    model::{
        channel::ReactionType,
        id::{
            ChannelId as DcChannelId, GuildId as DcGuildId, MessageId as DcMessageId, RoleId,
            UserId as DcUserId,
        },
        permissions::Permissions,
    },
};

pub mod handlers;
pub mod router;

use feedbot_core::{
    domain::{ChannelId, GuildId, MessageId, MessageRef, UserId},
    errors::Error,
    messaging::{
        port::ChatPort,
        types::{ChatCapabilities, SuggestionCard},
    },
    Result,
};

/// Discord's maximum message content length in characters.
const MAX_DISCORD_LEN: usize = 2000;

#[derive(Clone)]
pub struct DiscordMessenger {
    http: Arc<Http>,
    field_limit: usize,
}

impl DiscordMessenger {
    pub fn new(http: Arc<Http>, field_limit: usize) -> Self {
        Self { http, field_limit }
    }

    fn dc_channel(channel: ChannelId) -> DcChannelId {
        DcChannelId::new(channel.0)
    }

    fn dc_message(message: MessageId) -> DcMessageId {
        DcMessageId::new(message.0)
    }

    fn map_err(e: serenity::Error) -> Error {
        let (status, is_model) = match &e {
            serenity::Error::Http(http) => (http.status_code().map(|s| s.as_u16()), false),
            // Builder/model validation, e.g. an embed over Discord's size limits.
            serenity::Error::Model(_) => (None, true),
            _ => (None, false),
        };
        classify(status, is_model)(format!("discord error: {e}"))
    }

    fn sent(channel: ChannelId, msg: &serenity::model::channel::Message) -> MessageRef {
        MessageRef {
            channel_id: channel,
            message_id: MessageId(msg.id.get()),
        }
    }
}

/// Pick the error class for a failed Discord call.
fn classify(status: Option<u16>, is_model: bool) -> fn(String) -> Error {
    if is_model {
        return Error::DeliveryRejected;
    }
    match status {
        Some(403) => Error::Permission,
        Some(400) | Some(413) => Error::DeliveryRejected,
        _ => Error::External,
    }
}

/// Convert a core card into a serenity embed.
fn build_embed(card: &SuggestionCard) -> CreateEmbed {
    let mut builder = CreateEmbed::new()
        .title(&card.title)
        .description(&card.description)
        .color(card.color);
    for field in &card.fields {
        builder = builder.field(&field.name, &field.value, false);
    }
    if let Some(ref url) = card.thumbnail_url {
        builder = builder.thumbnail(url);
    }
    builder
}

/// Guild owners and holders of any role with ADMINISTRATOR are administrators.
/// `roles` must include the @everyone role.
fn grants_administrator(is_owner: bool, roles: impl IntoIterator<Item = Permissions>) -> bool {
    is_owner || roles.into_iter().any(|p| p.administrator())
}

#[async_trait]
impl ChatPort for DiscordMessenger {
    fn capabilities(&self) -> ChatCapabilities {
        ChatCapabilities {
            max_message_len: MAX_DISCORD_LEN,
            max_field_len: self.field_limit,
        }
    }

    async fn send_text(&self, channel: ChannelId, text: &str) -> Result<MessageRef> {
        let msg = Self::dc_channel(channel)
            .send_message(&*self.http, CreateMessage::new().content(text))
            .await
            .map_err(Self::map_err)?;
        Ok(Self::sent(channel, &msg))
    }

    async fn send_card(&self, channel: ChannelId, card: &SuggestionCard) -> Result<MessageRef> {
        let msg = Self::dc_channel(channel)
            .send_message(&*self.http, CreateMessage::new().embed(build_embed(card)))
            .await
            .map_err(Self::map_err)?;
        Ok(Self::sent(channel, &msg))
    }

    async fn delete_message(&self, msg: MessageRef) -> Result<()> {
        Self::dc_channel(msg.channel_id)
            .delete_message(&*self.http, Self::dc_message(msg.message_id))
            .await
            .map_err(Self::map_err)
    }

    async fn add_reaction(&self, msg: MessageRef, emoji: &str) -> Result<()> {
        let reaction = ReactionType::Unicode(emoji.to_string());
        self.http
            .create_reaction(
                Self::dc_channel(msg.channel_id),
                Self::dc_message(msg.message_id),
                &reaction,
            )
            .await
            .map_err(Self::map_err)
    }

    async fn send_direct(&self, user: UserId, text: &str) -> Result<()> {
        let dm = DcUserId::new(user.0)
            .create_dm_channel(&*self.http)
            .await
            .map_err(Self::map_err)?;
        dm.id
            .send_message(&*self.http, CreateMessage::new().content(text))
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }

    async fn is_administrator(&self, guild: GuildId, user: UserId) -> Result<bool> {
        let guild_id = DcGuildId::new(guild.0);
        let user_id = DcUserId::new(user.0);

        let partial = guild_id
            .to_partial_guild(&*self.http)
            .await
            .map_err(Self::map_err)?;
        let member = guild_id
            .member(&*self.http, user_id)
            .await
            .map_err(Self::map_err)?;

        // The @everyone role shares the guild's id.
        let everyone = RoleId::new(guild.0);
        let roles = member
            .roles
            .iter()
            .chain(std::iter::once(&everyone))
            .filter_map(|id| partial.roles.get(id))
            .map(|role| role.permissions);

        Ok(grants_administrator(partial.owner_id == user_id, roles))
    }

    async fn channel_name(&self, channel: ChannelId) -> Result<Option<String>> {
        let channel = Self::dc_channel(channel)
            .to_channel(&*self.http)
            .await
            .map_err(Self::map_err)?;
        Ok(channel.guild().map(|c| c.name))
    }
}
