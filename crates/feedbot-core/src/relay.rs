//! Forwarding suggestions to the output channel.

use tracing::{info, warn};

use crate::{
    domain::ChannelId,
    errors::Error,
    formatting::{
        format_suggestion, raw_suggestion_text, size_limit_notice, split_message, Sender,
        ANONYMOUS_THANKS, BOT_MISSING_PERMISSIONS, REACTION_BLOCKED, REACTION_SUCCESS,
    },
    messaging::{
        port::ChatPort,
        types::{Author, IncomingMessage},
    },
    Result,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelayOutcome {
    /// The card reached the output channel and the original was cleaned up.
    Delivered,
    /// The bot lacks send/manage permission; the sender was told.
    PermissionDenied,
    /// The platform refused the card; the sender got their text back by DM.
    Rejected,
}

/// Relay `msg` to `output`.
///
/// `identity` is `None` for anonymous (direct message) suggestions. Adapter
/// failures other than permission denials and rejections are returned as
/// errors for the caller to log.
pub async fn relay(
    port: &dyn ChatPort,
    output: ChannelId,
    identity: Option<&Author>,
    msg: &IncomingMessage,
) -> Result<RelayOutcome> {
    let channel_name = match identity {
        Some(_) => match port.channel_name(msg.channel_id()).await {
            Ok(Some(name)) => name,
            Ok(None) => msg.channel_id().to_string(),
            Err(e) => {
                warn!("could not look up channel {}: {e}", msg.channel_id());
                msg.channel_id().to_string()
            }
        },
        None => String::new(),
    };
    let sender = match identity {
        Some(author) => Sender::Attributed {
            author,
            channel_name: &channel_name,
        },
        None => Sender::Anonymous,
    };

    let card = format_suggestion(sender, msg);
    let limit = port.capabilities().max_field_len;

    if let Some(field) = card.oversized_field(limit) {
        warn!(
            "suggestion field {:?} exceeds {} characters, not sending",
            field.name, limit
        );
        return reject(port, identity.is_some(), msg, limit).await;
    }

    let delivered = async {
        port.send_card(output, &card).await?;
        if identity.is_some() {
            port.delete_message(msg.message).await
        } else {
            port.add_reaction(msg.message, REACTION_SUCCESS).await?;
            port.send_text(msg.channel_id(), ANONYMOUS_THANKS).await?;
            Ok::<(), Error>(())
        }
    };

    match delivered.await {
        Ok(()) => {
            info!(
                "relayed {} suggestion from channel {} to {}",
                if identity.is_some() { "attributed" } else { "anonymous" },
                msg.channel_id(),
                output
            );
            Ok(RelayOutcome::Delivered)
        }
        Err(Error::Permission(reason)) => {
            warn!("missing permission while relaying: {reason}");
            port.send_text(msg.channel_id(), BOT_MISSING_PERMISSIONS).await?;
            Ok(RelayOutcome::PermissionDenied)
        }
        Err(Error::DeliveryRejected(reason)) => {
            warn!("suggestion rejected by the platform: {reason}");
            reject(port, identity.is_some(), msg, limit).await
        }
        Err(e) => Err(e),
    }
}

/// Hand the raw text back to the author and explain the size limit.
async fn reject(
    port: &dyn ChatPort,
    attributed: bool,
    msg: &IncomingMessage,
    limit: usize,
) -> Result<RelayOutcome> {
    // Best-effort: closed DMs must not stop the cleanup and notice below.
    let raw = raw_suggestion_text(msg);
    for chunk in split_message(&raw, port.capabilities().max_message_len) {
        if let Err(e) = port.send_direct(msg.author.id, &chunk).await {
            warn!("could not return suggestion to {} by DM: {e}", msg.author.id);
            break;
        }
    }
    if attributed {
        port.delete_message(msg.message).await?;
    } else {
        port.add_reaction(msg.message, REACTION_BLOCKED).await?;
    }
    port.send_text(msg.channel_id(), &size_limit_notice(limit)).await?;
    Ok(RelayOutcome::Rejected)
}
