//! Conversion of Bot API updates into chat events.

use tracing::warn;

use pagesmith_core::chat::{ChatEvent, ImageRef, Input};
use pagesmith_types::action::{Action, Command};
use pagesmith_types::session::{ChatId, UserId};

use super::types::{Message, PhotoSize, Update};

/// What to do with one update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Incoming {
    /// The event to hand to the conversation service, if any.
    pub event: Option<ChatEvent>,
    /// Button press to acknowledge.
    pub callback_id: Option<String>,
}

/// Convert an update. Returns `None` for updates the bot has no use for
/// (edited messages, channel posts, messages without a sender...).
pub fn to_incoming(update: &Update) -> Option<Incoming> {
    if let Some(query) = &update.callback_query {
        let chat = query
            .message
            .as_ref()
            .map(|m| m.chat.id)
            .unwrap_or(query.from.id);

        let action = query.data.as_deref().and_then(Action::parse);
        if action.is_none() {
            warn!(update_id = update.update_id, data = ?query.data, "ignoring unknown button data");
        }

        return Some(Incoming {
            event: action.map(|action| ChatEvent {
                user: UserId(query.from.id),
                chat: ChatId(chat),
                input: Input::Action(action),
            }),
            callback_id: Some(query.id.clone()),
        });
    }

    let message = update.message.as_ref()?;
    let from = message.from.as_ref()?;
    if from.is_bot {
        return None;
    }

    Some(Incoming {
        event: Some(ChatEvent {
            user: UserId(from.id),
            chat: ChatId(message.chat.id),
            input: message_input(message),
        }),
        callback_id: None,
    })
}

fn message_input(message: &Message) -> Input {
    if let Some(text) = &message.text {
        return match Command::parse(text) {
            Some(command) => Input::Command(command),
            None => Input::Text(text.clone()),
        };
    }

    if let Some(photo) = message.photo.as_deref().and_then(largest_photo) {
        return Input::Image(ImageRef {
            file_id: photo.file_id.clone(),
            size: photo.file_size,
        });
    }

    if let Some(document) = &message.document {
        let is_image = document
            .mime_type
            .as_deref()
            .is_some_and(|mime| mime.starts_with("image/"));
        if is_image {
            return Input::Image(ImageRef {
                file_id: document.file_id.clone(),
                size: document.file_size,
            });
        }
    }

    Input::Unsupported
}

/// The highest-resolution size Telegram offers for a photo.
fn largest_photo(sizes: &[PhotoSize]) -> Option<&PhotoSize> {
    sizes.iter().max_by_key(|p| {
        (
            u64::from(p.width) * u64::from(p.height),
            p.file_size.unwrap_or(0),
        )
    })
}
