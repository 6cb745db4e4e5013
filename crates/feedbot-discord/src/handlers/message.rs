use serenity::model::channel::Message;

use feedbot_core::{
    domain::{ChannelId, GuildId, MessageId, MessageRef, UserId},
    messaging::types::{Attachment, Author, IncomingMessage},
};

/// Convert a gateway message into the core model.
pub fn to_incoming(msg: &Message) -> IncomingMessage {
    let nick = msg.member.as_ref().and_then(|m| m.nick.clone());
    let author = Author {
        id: UserId(msg.author.id.get()),
        username: msg.author.name.clone(),
        display_name: pick_display_name(nick, msg.author.global_name.clone(), &msg.author.name),
        avatar_url: Some(msg.author.face()),
    };

    IncomingMessage {
        message: MessageRef {
            channel_id: ChannelId(msg.channel_id.get()),
            message_id: MessageId(msg.id.get()),
        },
        author,
        guild_id: msg.guild_id.map(|g| GuildId(g.get())),
        content: msg.content.clone(),
        attachments: msg
            .attachments
            .iter()
            .map(|a| Attachment {
                filename: a.filename.clone(),
                url: a.proxy_url.clone(),
            })
            .collect(),
    }
}

/// Server nickname, then global display name, then the account handle.
fn pick_display_name(nick: Option<String>, global: Option<String>, username: &str) -> String {
    nick.or(global)
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| username.to_string())
}
