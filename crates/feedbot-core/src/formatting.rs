//! Suggestion cards and user-facing text.

use crate::messaging::types::{Author, CardField, IncomingMessage, SuggestionCard};

pub const ANONYMOUS_COLOR: u32 = 0xC0C0C0;
pub const ATTRIBUTED_COLOR: u32 = 0x00FF00;

pub const SUGGESTION_FIELD: &str = "Suggestion";
pub const ATTACHMENTS_FIELD: &str = "Attachments";

pub const REACTION_SUCCESS: &str = "\u{2705}";
pub const REACTION_BLOCKED: &str = "\u{1F6AB}";

pub const NOT_ADMIN: &str = "**Permissions Error** I'm sorry, only an administrator can do that.";
pub const NOT_IN_SERVER: &str = "**Permissions Error** I'm sorry, only an administrator can do this, and must do so from within the desired server.";
pub const BOT_MISSING_PERMISSIONS: &str = "**Permissions Error** I'm sorry, I can't do that. I don't have permission. I require the \"Manage Messages\" permission here and the \"Send Messages\" permission in the output channel.";
pub const ANONYMOUS_THANKS: &str = "Thank you for your anonymous suggestion!";
pub const SAVE_FAILED: &str =
    "**Internal Error** I couldn't save that setting, so nothing was changed. Please try again later.";

/// Who a suggestion is attributed to.
#[derive(Clone, Copy, Debug)]
pub enum Sender<'a> {
    Anonymous,
    Attributed {
        author: &'a Author,
        channel_name: &'a str,
    },
}

/// Build the card posted to the output channel.
pub fn format_suggestion(sender: Sender<'_>, msg: &IncomingMessage) -> SuggestionCard {
    let (title, description, color, thumbnail_url) = match sender {
        Sender::Anonymous => (
            "Suggestion Message sent by Anonymous".to_string(),
            "Message received from Private Message".to_string(),
            ANONYMOUS_COLOR,
            None,
        ),
        Sender::Attributed {
            author,
            channel_name,
        } => (
            format!(
                "Suggestion Message sent by {} (@{})",
                author.display_name, author.username
            ),
            format!("Message received from #{channel_name}"),
            ATTRIBUTED_COLOR,
            author.avatar_url.clone(),
        ),
    };

    let mut fields = Vec::new();
    if !msg.content.is_empty() {
        fields.push(CardField {
            name: SUGGESTION_FIELD.to_string(),
            value: msg.content.clone(),
        });
    }
    if !msg.attachments.is_empty() {
        let mut value = format!(
            "User included {} attachment(s):\n",
            msg.attachments.len()
        );
        for a in &msg.attachments {
            value.push_str(&format!("{} {}\n", a.filename, a.url));
        }
        fields.push(CardField {
            name: ATTACHMENTS_FIELD.to_string(),
            value,
        });
    }

    SuggestionCard {
        title,
        description,
        color,
        fields,
        thumbnail_url,
    }
}

/// The message text plus one line per attachment URL, for the DM fallback.
pub fn raw_suggestion_text(msg: &IncomingMessage) -> String {
    let mut lines: Vec<&str> = Vec::with_capacity(msg.attachments.len() + 1);
    if !msg.content.is_empty() {
        lines.push(&msg.content);
    }
    lines.extend(msg.attachments.iter().map(|a| a.url.as_str()));
    lines.join("\n")
}

/// Split `text` into chunks of at most `max_len` characters, preferring to
/// break at a newline (which is dropped).
pub fn split_message(text: &str, max_len: usize) -> Vec<String> {
    let max_len = max_len.max(1);
    let mut chunks = Vec::new();
    let mut rest = text;

    while rest.chars().count() > max_len {
        // Byte offset just past the last character that fits.
        let end = rest
            .char_indices()
            .nth(max_len)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        match rest[..end].rfind('\n').filter(|&i| i > 0) {
            Some(nl) => {
                chunks.push(rest[..nl].to_string());
                rest = &rest[nl + 1..];
            }
            None => {
                chunks.push(rest[..end].to_string());
                rest = &rest[end..];
            }
        }
    }

    if !rest.is_empty() {
        chunks.push(rest.to_string());
    }
    chunks
}

pub fn size_limit_notice(limit: usize) -> String {
    format!("Suggestions must remain below {limit} characters.")
}

pub fn usage_notice(detail: &str) -> String {
    format!("**Usage Error** {detail}")
}

pub fn help_text(prefix: &str) -> String {
    format!(
        "Thank you for requesting suggestion help!\n \
         To send a suggestion, simply send a message in the designated suggestion input channel on your desired server. \
         To send an anonymous suggestion, simply reply to me here.\n\n\
         **Other Commands Below:**\n \
         - **setprefix** *<character prefix>*\n\tEx: {prefix}setprefix @\n \
         - **setinput** *<channel>*\n\t EX: {prefix}setinput #suggestion-box\n \
         - **setoutput** *<channel>*\n\t Ex: {prefix}setoutput #suggestion-log\n \
         - **help**\n\t Receive this message.\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChannelId, GuildId, MessageId, MessageRef, UserId};
    use crate::messaging::types::Attachment;

    fn author() -> Author {
        Author {
            id: UserId(7),
            username: "ada".into(),
            display_name: "Ada L".into(),
            avatar_url: Some("https://cdn.example/ada.png".into()),
        }
    }

    fn msg(content: &str, attachments: Vec<Attachment>) -> IncomingMessage {
        IncomingMessage {
            message: MessageRef {
                channel_id: ChannelId(1),
                message_id: MessageId(2),
            },
            author: author(),
            guild_id: Some(GuildId(3)),
            content: content.into(),
            attachments,
        }
    }

    #[test]
    fn anonymous_card_has_no_identity() {
        let card = format_suggestion(Sender::Anonymous, &msg("more tea", vec![]));
        assert_eq!(card.title, "Suggestion Message sent by Anonymous");
        assert_eq!(card.description, "Message received from Private Message");
        assert_eq!(card.color, ANONYMOUS_COLOR);
        assert_eq!(card.thumbnail_url, None);
        assert_eq!(card.field(SUGGESTION_FIELD).unwrap().value, "more tea");
        assert!(card.field(ATTACHMENTS_FIELD).is_none());
    }

    #[test]
    fn attributed_card_names_author_and_channel() {
        let a = author();
        let card = format_suggestion(
            Sender::Attributed {
                author: &a,
                channel_name: "suggestion-box",
            },
            &msg("", vec![]),
        );
        assert_eq!(card.title, "Suggestion Message sent by Ada L (@ada)");
        assert_eq!(card.description, "Message received from #suggestion-box");
        assert_eq!(card.color, ATTRIBUTED_COLOR);
        assert_eq!(card.thumbnail_url.as_deref(), Some("https://cdn.example/ada.png"));
        assert!(card.fields.is_empty());
    }

    #[test]
    fn attachments_are_listed_in_order() {
        let files = vec![
            Attachment {
                filename: "a.png".into(),
                url: "https://m/a".into(),
            },
            Attachment {
                filename: "b.txt".into(),
                url: "https://m/b".into(),
            },
        ];
        let m = msg("see files", files);
        let card = format_suggestion(Sender::Anonymous, &m);
        assert_eq!(
            card.field(ATTACHMENTS_FIELD).unwrap().value,
            "User included 2 attachment(s):\na.png https://m/a\nb.txt https://m/b\n"
        );
        assert_eq!(raw_suggestion_text(&m), "see files\nhttps://m/a\nhttps://m/b");
    }

    #[test]
    fn split_message_prefers_newlines() {
        assert_eq!(split_message("short", 10), vec!["short"]);
        assert!(split_message("", 10).is_empty());
        assert_eq!(split_message("aaaa\nbbbb\ncc", 10), vec!["aaaa\nbbbb", "cc"]);
        assert_eq!(split_message("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn split_message_counts_characters_not_bytes() {
        let text = "é".repeat(5);
        let chunks = split_message(&text, 2);
        assert_eq!(chunks, vec!["éé", "éé", "é"]);
    }

    #[test]
    fn help_uses_current_prefix() {
        let help = help_text("!");
        assert!(help.contains("!setinput #suggestion-box"));
        assert!(!help.contains("$setprefix"));
    }
}
