//! In-memory `ChatPort` that records every call.

use std::{
    collections::{HashMap, HashSet},
    sync::Mutex,
};

use async_trait::async_trait;

use crate::{
    domain::{ChannelId, GuildId, MessageId, MessageRef, UserId},
    errors::Error,
    messaging::{
        port::ChatPort,
        types::{ChatCapabilities, SuggestionCard},
    },
    Result,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Call {
    Text(ChannelId, String),
    Card(ChannelId, SuggestionCard),
    Delete(MessageRef),
    React(MessageRef, String),
    Direct(UserId, String),
}

#[derive(Clone, Copy, Debug)]
pub(crate) enum Failure {
    Permission,
    Rejected,
    External,
}

impl Failure {
    fn into_error(self) -> Error {
        match self {
            Failure::Permission => Error::Permission("missing access".into()),
            Failure::Rejected => Error::DeliveryRejected("bad embed".into()),
            Failure::External => Error::External("gateway timeout".into()),
        }
    }
}

pub(crate) struct FakeChat {
    calls: Mutex<Vec<Call>>,
    admins: HashSet<(u64, u64)>,
    channel_names: HashMap<u64, String>,
    channel_lookup_fails: bool,
    card_failure: Option<Failure>,
    delete_failure: Option<Failure>,
    react_failure: Option<Failure>,
    direct_failure: Option<Failure>,
    field_limit: usize,
    message_limit: usize,
}

impl FakeChat {
    pub(crate) fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            admins: HashSet::new(),
            channel_names: HashMap::new(),
            channel_lookup_fails: false,
            card_failure: None,
            delete_failure: None,
            react_failure: None,
            direct_failure: None,
            field_limit: 1024,
            message_limit: 2000,
        }
    }

    pub(crate) fn with_admin(mut self, guild: GuildId, user: UserId) -> Self {
        self.admins.insert((guild.0, user.0));
        self
    }

    pub(crate) fn with_channel_name(mut self, channel: ChannelId, name: &str) -> Self {
        self.channel_names.insert(channel.0, name.to_string());
        self
    }

    pub(crate) fn failing_channel_lookup(mut self) -> Self {
        self.channel_lookup_fails = true;
        self
    }

    pub(crate) fn failing_cards(mut self, failure: Failure) -> Self {
        self.card_failure = Some(failure);
        self
    }

    pub(crate) fn failing_deletes(mut self, failure: Failure) -> Self {
        self.delete_failure = Some(failure);
        self
    }

    pub(crate) fn failing_reactions(mut self, failure: Failure) -> Self {
        self.react_failure = Some(failure);
        self
    }

    pub(crate) fn failing_directs(mut self, failure: Failure) -> Self {
        self.direct_failure = Some(failure);
        self
    }

    pub(crate) fn with_field_limit(mut self, limit: usize) -> Self {
        self.field_limit = limit;
        self
    }

    /// Texts and DMs longer than `limit` characters are rejected.
    pub(crate) fn with_message_limit(mut self, limit: usize) -> Self {
        self.message_limit = limit;
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_ref(&self, channel: ChannelId) -> MessageRef {
        let n = self.calls.lock().unwrap().len() as u64;
        MessageRef {
            channel_id: channel,
            message_id: MessageId(10_000 + n),
        }
    }

    fn check_len(&self, text: &str) -> Result<()> {
        if text.chars().count() > self.message_limit {
            return Err(Error::DeliveryRejected("BASE_TYPE_MAX_LENGTH".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl ChatPort for FakeChat {
    fn capabilities(&self) -> ChatCapabilities {
        ChatCapabilities {
            max_message_len: self.message_limit,
            max_field_len: self.field_limit,
        }
    }

    async fn send_text(&self, channel: ChannelId, text: &str) -> Result<MessageRef> {
        self.check_len(text)?;
        self.record(Call::Text(channel, text.to_string()));
        Ok(self.next_ref(channel))
    }

    async fn send_card(&self, channel: ChannelId, card: &SuggestionCard) -> Result<MessageRef> {
        if let Some(failure) = self.card_failure {
            return Err(failure.into_error());
        }
        self.record(Call::Card(channel, card.clone()));
        Ok(self.next_ref(channel))
    }

    async fn delete_message(&self, msg: MessageRef) -> Result<()> {
        if let Some(failure) = self.delete_failure {
            return Err(failure.into_error());
        }
        self.record(Call::Delete(msg));
        Ok(())
    }

    async fn add_reaction(&self, msg: MessageRef, emoji: &str) -> Result<()> {
        if let Some(failure) = self.react_failure {
            return Err(failure.into_error());
        }
        self.record(Call::React(msg, emoji.to_string()));
        Ok(())
    }

    async fn send_direct(&self, user: UserId, text: &str) -> Result<()> {
        if let Some(failure) = self.direct_failure {
            return Err(failure.into_error());
        }
        self.check_len(text)?;
        self.record(Call::Direct(user, text.to_string()));
        Ok(())
    }

    async fn is_administrator(&self, guild: GuildId, user: UserId) -> Result<bool> {
        Ok(self.admins.contains(&(guild.0, user.0)))
    }

    async fn channel_name(&self, channel: ChannelId) -> Result<Option<String>> {
        if self.channel_lookup_fails {
            return Err(Error::External("unknown channel".into()));
        }
        Ok(self.channel_names.get(&channel.0).cloned())
    }
}
