//! TelegramTransport -- concrete [`ChatTransport`] implementation.

use pagesmith_core::chat::{ButtonTarget, ChatTransport, ImageRef, Reply};
use pagesmith_types::error::ChatError;
use pagesmith_types::session::ChatId;

use super::client::TelegramClient;
use super::types::{InlineKeyboardButton, InlineKeyboardMarkup};

/// Sends replies and downloads logos through the Bot API.
#[derive(Clone)]
pub struct TelegramTransport {
    client: TelegramClient,
    max_logo_bytes: u64,
}

impl TelegramTransport {
    pub fn new(client: TelegramClient, max_logo_bytes: u64) -> Self {
        Self {
            client,
            max_logo_bytes,
        }
    }

    pub fn client(&self) -> &TelegramClient {
        &self.client
    }
}

/// Inline keyboard for a reply, or `None` if it has no buttons.
pub fn keyboard(reply: &Reply) -> Option<InlineKeyboardMarkup> {
    if reply.buttons.is_empty() {
        return None;
    }
    let inline_keyboard = reply
        .buttons
        .iter()
        .map(|row| {
            row.iter()
                .map(|button| match &button.target {
                    ButtonTarget::Action(action) => InlineKeyboardButton {
                        text: button.label.clone(),
                        callback_data: Some(action.encode()),
                        url: None,
                    },
                    ButtonTarget::Url(url) => InlineKeyboardButton {
                        text: button.label.clone(),
                        callback_data: None,
                        url: Some(url.clone()),
                    },
                })
                .collect()
        })
        .collect();
    Some(InlineKeyboardMarkup { inline_keyboard })
}

impl ChatTransport for TelegramTransport {
    async fn send(&self, chat: ChatId, reply: &Reply) -> Result<(), ChatError> {
        self.client
            .send_message(chat.0, &reply.text, keyboard(reply))
            .await
    }

    async fn fetch_image(&self, image: &ImageRef) -> Result<Vec<u8>, ChatError> {
        let limit = self.max_logo_bytes;
        if let Some(size) = image.size.filter(|size| *size > limit) {
            return Err(ChatError::AssetTooLarge { size, limit });
        }

        let file = self.client.get_file(&image.file_id).await?;
        if let Some(size) = file.file_size.filter(|size| *size > limit) {
            return Err(ChatError::AssetTooLarge { size, limit });
        }
        let path = file
            .file_path
            .ok_or_else(|| ChatError::Download("file is not available for download".to_string()))?;

        self.client.download_file(&path, limit).await
    }
}
