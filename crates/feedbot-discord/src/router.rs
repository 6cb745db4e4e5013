use std::sync::Arc;

use anyhow::Context as _;
use serenity::{http::Http, prelude::GatewayIntents, Client};
use tracing::info;

use feedbot_core::{bot::Feedbot, config::Config, store::ConfigStore};

use crate::{handlers::Handler, DiscordMessenger};

fn intents() -> GatewayIntents {
    GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
}

/// Connect to the gateway and dispatch events until the connection ends.
pub async fn run_gateway(cfg: Arc<Config>, store: ConfigStore) -> anyhow::Result<()> {
    let http = Arc::new(Http::new(&cfg.discord_token));
    let messenger = Arc::new(DiscordMessenger::new(http, cfg.field_limit));
    let bot = Arc::new(Feedbot::new(store, messenger));

    let mut client = Client::builder(&cfg.discord_token, intents())
        .event_handler(Handler::new(bot))
        .await
        .context("failed to build discord client")?;

    info!("connecting to discord gateway");
    client
        .start()
        .await
        .context("discord gateway connection failed")?;

    Ok(())
}
