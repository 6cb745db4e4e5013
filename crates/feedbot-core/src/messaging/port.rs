use async_trait::async_trait;

use crate::{
    domain::{ChannelId, GuildId, MessageRef, UserId},
    messaging::types::{ChatCapabilities, SuggestionCard},
    Result,
};

/// Chat-platform port.
///
/// Implementations map permission failures to [`Error::Permission`] and
/// payload rejections to [`Error::DeliveryRejected`]; everything else is
/// [`Error::External`].
///
/// [`Error::Permission`]: crate::Error::Permission
/// [`Error::DeliveryRejected`]: crate::Error::DeliveryRejected
/// [`Error::External`]: crate::Error::External
#[async_trait]
pub trait ChatPort: Send + Sync {
    fn capabilities(&self) -> ChatCapabilities;

    async fn send_text(&self, channel: ChannelId, text: &str) -> Result<MessageRef>;
    async fn send_card(&self, channel: ChannelId, card: &SuggestionCard) -> Result<MessageRef>;
    async fn delete_message(&self, msg: MessageRef) -> Result<()>;
    async fn add_reaction(&self, msg: MessageRef, emoji: &str) -> Result<()>;
    async fn send_direct(&self, user: UserId, text: &str) -> Result<()>;

    /// Whether `user` holds the administrator permission in `guild`.
    async fn is_administrator(&self, guild: GuildId, user: UserId) -> Result<bool>;

    /// Display name of a server channel, `None` for private channels.
    async fn channel_name(&self, channel: ChannelId) -> Result<Option<String>>;
}
