//! Command recognition for one incoming message.
//!
//! Routing is an ordered table of rules; the first rule that returns an
//! [`Action`] wins and the remaining rules are skipped.

use crate::{
    domain::ChannelId,
    formatting::{NOT_ADMIN, NOT_IN_SERVER},
    messaging::types::IncomingMessage,
    store::BotConfig,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Nothing to do.
    Ignore,
    /// Reply with the message and add a blocked reaction.
    Deny(&'static str),
    /// Reply with a usage error and add a blocked reaction.
    Usage(String),
    SetPrefix(String),
    SetInput(ChannelId),
    SetOutput(ChannelId),
    Help,
    RelayAnonymous,
    RelayAttributed,
}

pub struct RouteContext<'a> {
    pub config: &'a BotConfig,
    pub message: &'a IncomingMessage,
    /// The author is the bot itself.
    pub from_self: bool,
    /// Only meaningful inside a server.
    pub author_is_admin: bool,
}

type Rule = fn(&RouteContext<'_>) -> Option<Action>;

const RULES: &[(&str, Rule)] = &[
    ("self", from_self),
    ("admin-gate", admin_gate),
    ("setprefix", set_prefix),
    ("setinput", set_input),
    ("setoutput", set_output),
    ("help", help),
    ("relay-inactive", relay_inactive),
    ("direct-message", direct_message),
    ("input-channel", input_channel),
];

pub fn route(ctx: &RouteContext<'_>) -> Action {
    RULES
        .iter()
        .find_map(|(_, rule)| rule(ctx))
        .unwrap_or(Action::Ignore)
}

/// Whether the message is one of the administrator-only `set` commands, so the
/// caller knows to look up the author's permissions before routing.
pub fn is_admin_command(prefix: &str, content: &str) -> bool {
    strip_prefix_ci(content, prefix)
        .and_then(|rest| strip_prefix_ci(rest, "set"))
        .is_some()
}

/// Recover a channel id from `<#123>` (or a bare `123`).
pub fn parse_channel_mention(raw: &str) -> Option<ChannelId> {
    let raw = raw.trim();
    let digits = raw
        .strip_prefix("<#")
        .and_then(|s| s.strip_suffix('>'))
        .unwrap_or(raw);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits
        .parse::<u64>()
        .ok()
        .filter(|id| *id != 0)
        .map(ChannelId)
}

fn strip_prefix_ci<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let mut rest = s;
    for p in prefix.chars() {
        let mut it = rest.chars();
        let c = it.next()?;
        if !c.to_lowercase().eq(p.to_lowercase()) {
            return None;
        }
        rest = it.as_str();
    }
    Some(rest)
}

/// `(command word, first argument)` when the message starts with the prefix.
fn command<'a>(ctx: &RouteContext<'a>) -> Option<(String, Option<&'a str>)> {
    let rest = strip_prefix_ci(&ctx.message.content, &ctx.config.prefix)?;
    if rest.starts_with(char::is_whitespace) {
        return None;
    }
    let mut parts = rest.split_whitespace();
    let word = parts.next()?.to_lowercase();
    Some((word, parts.next()))
}

fn from_self(ctx: &RouteContext<'_>) -> Option<Action> {
    ctx.from_self.then_some(Action::Ignore)
}

fn admin_gate(ctx: &RouteContext<'_>) -> Option<Action> {
    if !is_admin_command(&ctx.config.prefix, &ctx.message.content) {
        return None;
    }
    if ctx.message.is_direct() {
        return Some(Action::Deny(NOT_IN_SERVER));
    }
    if !ctx.author_is_admin {
        return Some(Action::Deny(NOT_ADMIN));
    }
    None
}

fn set_prefix(ctx: &RouteContext<'_>) -> Option<Action> {
    match command(ctx)? {
        (word, Some(arg)) if word == "setprefix" => Some(Action::SetPrefix(arg.to_string())),
        (word, None) if word == "setprefix" => Some(Action::Usage(format!(
            "Expected a prefix character, e.g. `{}setprefix @`.",
            ctx.config.prefix
        ))),
        _ => None,
    }
}

fn set_input(ctx: &RouteContext<'_>) -> Option<Action> {
    channel_command(ctx, "setinput", "suggestion-box")
        .map(|r| r.map_or_else(Action::Usage, Action::SetInput))
}

fn set_output(ctx: &RouteContext<'_>) -> Option<Action> {
    channel_command(ctx, "setoutput", "suggestion-log")
        .map(|r| r.map_or_else(Action::Usage, Action::SetOutput))
}

fn channel_command(
    ctx: &RouteContext<'_>,
    name: &str,
    example: &str,
) -> Option<Result<ChannelId, String>> {
    let (word, arg) = command(ctx)?;
    if word != name {
        return None;
    }
    Some(arg.and_then(parse_channel_mention).ok_or_else(|| {
        format!(
            "Expected a channel mention, e.g. `{}{name} #{example}`.",
            ctx.config.prefix
        )
    }))
}

fn help(ctx: &RouteContext<'_>) -> Option<Action> {
    let (word, _) = command(ctx)?;
    (word == "help").then_some(Action::Help)
}

fn relay_inactive(ctx: &RouteContext<'_>) -> Option<Action> {
    (!ctx.config.relay_active()).then_some(Action::Ignore)
}

fn direct_message(ctx: &RouteContext<'_>) -> Option<Action> {
    ctx.message.is_direct().then_some(Action::RelayAnonymous)
}

fn input_channel(ctx: &RouteContext<'_>) -> Option<Action> {
    (ctx.message.channel_id() == ctx.config.input_channel).then_some(Action::RelayAttributed)
}
