//! The event handler: routes each incoming message and performs the action.

use std::sync::{Arc, OnceLock};

use tracing::{debug, error, info, warn};

use crate::{
    commands::{is_admin_command, route, Action, RouteContext},
    domain::UserId,
    errors::Error,
    formatting::{help_text, usage_notice, REACTION_BLOCKED, REACTION_SUCCESS, SAVE_FAILED},
    messaging::{port::ChatPort, types::IncomingMessage},
    relay::{relay, RelayOutcome},
    store::{BotConfig, ConfigStore},
    Result,
};

pub struct Feedbot {
    store: ConfigStore,
    port: Arc<dyn ChatPort>,
    self_id: OnceLock<UserId>,
}

impl Feedbot {
    pub fn new(store: ConfigStore, port: Arc<dyn ChatPort>) -> Self {
        Self {
            store,
            port,
            self_id: OnceLock::new(),
        }
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    /// Record the bot's own identity once the connection is up.
    pub async fn on_ready(&self, me: UserId, name: &str) {
        if self.self_id.set(me).is_err() {
            debug!("reconnected as {name} ({me})");
            return;
        }
        let cfg = self.store.snapshot().await;
        info!("connected as {name} ({me})");
        info!(
            "settings from {}: prefix {:?}, input {}, output {}",
            self.store.path().display(),
            cfg.prefix,
            cfg.input_channel,
            cfg.output_channel
        );
        if !cfg.relay_active() {
            warn!("input/output channels are not configured yet; relaying is inactive");
        }
    }

    /// Handle one incoming message. Errors are adapter failures the caller
    /// should log; user-facing recovery has already happened.
    pub async fn on_message(&self, msg: &IncomingMessage) -> Result<()> {
        let from_self = self.self_id.get() == Some(&msg.author.id);
        if from_self {
            return Ok(());
        }

        let cfg = self.store.snapshot().await;
        let author_is_admin = match msg.guild_id {
            Some(guild) if is_admin_command(&cfg.prefix, &msg.content) => {
                self.port.is_administrator(guild, msg.author.id).await?
            }
            _ => false,
        };

        let action = route(&RouteContext {
            config: &cfg,
            message: msg,
            from_self,
            author_is_admin,
        });
        self.execute(action, &cfg, msg).await
    }

    async fn execute(&self, action: Action, cfg: &BotConfig, msg: &IncomingMessage) -> Result<()> {
        match action {
            Action::Ignore => Ok(()),
            Action::Deny(text) => {
                info!(
                    "denied admin command from {} ({})",
                    msg.author.username, msg.author.id
                );
                self.refuse(msg, text).await
            }
            Action::Usage(detail) => self.refuse(msg, &usage_notice(&detail)).await,
            Action::SetPrefix(prefix) => {
                let res = self.store.set_prefix(&prefix).await;
                self.acknowledge(msg, "prefix", res).await
            }
            Action::SetInput(channel) => {
                let res = self.store.set_input_channel(channel).await;
                self.acknowledge(msg, "input channel", res).await
            }
            Action::SetOutput(channel) => {
                let res = self.store.set_output_channel(channel).await;
                self.acknowledge(msg, "output channel", res).await
            }
            Action::Help => {
                self.port
                    .send_direct(msg.author.id, &help_text(&cfg.prefix))
                    .await?;
                self.port.add_reaction(msg.message, REACTION_SUCCESS).await
            }
            Action::RelayAnonymous => self.relay(cfg, false, msg).await,
            Action::RelayAttributed => self.relay(cfg, true, msg).await,
        }
    }

    async fn relay(&self, cfg: &BotConfig, attributed: bool, msg: &IncomingMessage) -> Result<()> {
        let identity = attributed.then_some(&msg.author);
        match relay(self.port.as_ref(), cfg.output_channel, identity, msg).await? {
            RelayOutcome::Delivered => {}
            RelayOutcome::PermissionDenied => {
                warn!("could not relay suggestion: missing permissions")
            }
            RelayOutcome::Rejected => {
                info!("suggestion from {} returned by DM", msg.author.id)
            }
        }
        Ok(())
    }

    async fn refuse(&self, msg: &IncomingMessage, text: &str) -> Result<()> {
        self.port.send_text(msg.channel_id(), text).await?;
        self.port.add_reaction(msg.message, REACTION_BLOCKED).await
    }

    /// React only once the new setting is on disk.
    async fn acknowledge(
        &self,
        msg: &IncomingMessage,
        what: &str,
        res: Result<BotConfig>,
    ) -> Result<()> {
        match res {
            Ok(cfg) => {
                info!(
                    "{what} updated by {} ({}): prefix {:?}, input {}, output {}",
                    msg.author.username,
                    msg.author.id,
                    cfg.prefix,
                    cfg.input_channel,
                    cfg.output_channel
                );
                self.port.add_reaction(msg.message, REACTION_SUCCESS).await
            }
            Err(Error::Usage(detail)) => self.refuse(msg, &usage_notice(&detail)).await,
            Err(e @ Error::Persistence { .. }) => {
                error!("failed to save {what}: {e}");
                self.refuse(msg, SAVE_FAILED).await
            }
            Err(e) => Err(e),
        }
    }
}
