//! Gateway event handlers.
//!
//! Each event is converted into the core model and handed to [`Feedbot`];
//! failures are logged here and never bring the client down.

use std::sync::Arc;

use serenity::{
    async_trait,
    model::{channel::Message, gateway::Ready},
    prelude::{Context, EventHandler},
};
use tracing::error;

use feedbot_core::{bot::Feedbot, domain::UserId};

mod message;

pub use message::to_incoming;

pub struct Handler {
    bot: Arc<Feedbot>,
}

impl Handler {
    pub fn new(bot: Arc<Feedbot>) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        self.bot
            .on_ready(UserId(ready.user.id.get()), &ready.user.name)
            .await;
    }

    async fn message(&self, _ctx: Context, msg: Message) {
        let incoming = to_incoming(&msg);
        if let Err(e) = self.bot.on_message(&incoming).await {
            error!(
                "failed to handle message {} in channel {}: {e}",
                msg.id, msg.channel_id
            );
        }
    }
}
