use std::sync::Arc;

use tracing::info;

use feedbot_core::{config::Config, store::ConfigStore};

#[tokio::main]
async fn main() -> Result<(), feedbot_core::Error> {
    feedbot_core::logging::init("feedbot")?;

    let cfg = Arc::new(Config::load()?);
    info!("settings file: {}", cfg.settings_file.display());

    let store = ConfigStore::open(cfg.settings_file.clone()).await?;

    feedbot_discord::router::run_gateway(cfg, store)
        .await
        .map_err(|e| feedbot_core::Error::External(format!("discord bot failed: {e:#}")))?;

    Ok(())
}
