//! Chat transport port.
//!
//! The transport delivers user events to the conversation service and sends
//! its replies back. Button layouts are described here in transport-neutral
//! terms; the Telegram adapter turns them into inline keyboards.

use std::future::Future;

use pagesmith_types::action::{Action, Command};
use pagesmith_types::error::ChatError;
use pagesmith_types::session::{ChatId, UserId};

/// Reference to an uploaded image that has not been downloaded yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub file_id: String,
    /// Size reported by the transport, when known.
    pub size: Option<u64>,
}

/// What the user sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Command(Command),
    Action(Action),
    Text(String),
    Image(ImageRef),
    /// Anything else (stickers, non-image documents, voice notes...).
    Unsupported,
}

/// One incoming user event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEvent {
    pub user: UserId,
    pub chat: ChatId,
    pub input: Input,
}

/// What pressing a button does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonTarget {
    Action(Action),
    Url(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub target: ButtonTarget,
}

impl Button {
    pub fn action(label: impl Into<String>, action: Action) -> Self {
        Self {
            label: label.into(),
            target: ButtonTarget::Action(action),
        }
    }

    pub fn url(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            target: ButtonTarget::Url(url.into()),
        }
    }
}

/// A message to send, with an optional grid of buttons (one `Vec` per row).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub buttons: Vec<Vec<Button>>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            buttons: Vec::new(),
        }
    }

    /// Append a row with a single button.
    pub fn with_button(mut self, button: Button) -> Self {
        self.buttons.push(vec![button]);
        self
    }
}

/// Trait for chat backends.
///
/// Implementations live in pagesmith-infra (e.g., `TelegramTransport`).
pub trait ChatTransport: Send + Sync {
    /// Send a reply to a chat.
    fn send(
        &self,
        chat: ChatId,
        reply: &Reply,
    ) -> impl Future<Output = Result<(), ChatError>> + Send;

    /// Download an uploaded image.
    fn fetch_image(
        &self,
        image: &ImageRef,
    ) -> impl Future<Output = Result<Vec<u8>, ChatError>> + Send;
}
