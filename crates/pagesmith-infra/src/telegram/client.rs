//! TelegramClient -- minimal Bot API client.
//!
//! Every method is a JSON `POST` to `{base}/bot{token}/{method}`. The token is
//! part of the URL, so reqwest errors are stripped of their URL before they
//! are turned into [`ChatError`]s and nothing here logs a request URL.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use pagesmith_types::config::TelegramSettings;
use pagesmith_types::error::ChatError;

use super::types::{
    AnswerCallbackQuery, ApiResponse, DeleteWebhook, Empty, File, GetFile, GetUpdates,
    InlineKeyboardMarkup, SendMessage, SetWebhook, Update, User, ALLOWED_UPDATES,
};

/// Bot API client. Cheap to clone.
#[derive(Clone)]
pub struct TelegramClient {
    client: reqwest::Client,
    token: SecretString,
    base_url: String,
    timeout: Duration,
}

impl TelegramClient {
    /// Create a client; `timeout` bounds every call except the long poll,
    /// which gets `timeout` on top of its wait.
    pub fn new(token: SecretString, settings: &TelegramSettings, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            token,
            base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    /// Override the base URL (useful for testing or a local Bot API server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{method}", self.base_url, self.token.expose_secret())
    }

    async fn call<P, R>(&self, method: &str, params: &P, timeout: Duration) -> Result<R, ChatError>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        debug!(method, "telegram call");
        let response = self
            .client
            .post(self.method_url(method))
            .timeout(timeout)
            .json(params)
            .send()
            .await
            .map_err(|e| ChatError::Request(e.without_url().to_string()))?;

        let status = response.status();
        let body: ApiResponse<R> = response.json().await.map_err(|e| {
            ChatError::Api(format!(
                "{method}: unreadable response (HTTP {status}): {}",
                e.without_url()
            ))
        })?;

        match body {
            ApiResponse {
                ok: true,
                result: Some(result),
                ..
            } => Ok(result),
            ApiResponse { description, .. } => Err(ChatError::Api(format!(
                "{method}: {}",
                description.unwrap_or_else(|| format!("HTTP {status}"))
            ))),
        }
    }

    /// `getMe`: the bot's own account, used to verify the token.
    pub async fn get_me(&self) -> Result<User, ChatError> {
        self.call("getMe", &Empty {}, self.timeout).await
    }

    /// Long-poll for updates after `offset`, waiting up to `wait_secs`.
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        wait_secs: u64,
    ) -> Result<Vec<Update>, ChatError> {
        let params = GetUpdates {
            offset,
            timeout: wait_secs,
            allowed_updates: ALLOWED_UPDATES.to_vec(),
        };
        self.call(
            "getUpdates",
            &params,
            self.timeout + Duration::from_secs(wait_secs),
        )
        .await
    }

    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_markup: Option<InlineKeyboardMarkup>,
    ) -> Result<(), ChatError> {
        let params = SendMessage {
            chat_id,
            text,
            reply_markup,
        };
        let _: serde_json::Value = self.call("sendMessage", &params, self.timeout).await?;
        Ok(())
    }

    /// Acknowledge a button press so the client stops its progress spinner.
    pub async fn answer_callback_query(&self, callback_query_id: &str) -> Result<(), ChatError> {
        let params = AnswerCallbackQuery { callback_query_id };
        let _: bool = self
            .call("answerCallbackQuery", &params, self.timeout)
            .await?;
        Ok(())
    }

    pub async fn get_file(&self, file_id: &str) -> Result<File, ChatError> {
        self.call("getFile", &GetFile { file_id }, self.timeout)
            .await
    }

    /// Download a file returned by [`TelegramClient::get_file`], refusing
    /// anything larger than `limit` bytes.
    pub async fn download_file(&self, file_path: &str, limit: u64) -> Result<Vec<u8>, ChatError> {
        let url = format!(
            "{}/file/bot{}/{file_path}",
            self.base_url,
            self.token.expose_secret()
        );
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ChatError::Download(e.without_url().to_string()))?;

        if !response.status().is_success() {
            return Err(ChatError::Download(format!("HTTP {}", response.status())));
        }
        if let Some(size) = response.content_length().filter(|size| *size > limit) {
            return Err(ChatError::AssetTooLarge { size, limit });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ChatError::Download(e.without_url().to_string()))?;
        if bytes.len() as u64 > limit {
            return Err(ChatError::AssetTooLarge {
                size: bytes.len() as u64,
                limit,
            });
        }
        Ok(bytes.to_vec())
    }

    /// Route updates to `url`, signed with `secret_token` when given.
    pub async fn set_webhook(&self, url: &str, secret_token: Option<&str>) -> Result<(), ChatError> {
        let params = SetWebhook {
            url,
            secret_token,
            allowed_updates: ALLOWED_UPDATES.to_vec(),
        };
        let _: bool = self.call("setWebhook", &params, self.timeout).await?;
        Ok(())
    }

    /// Remove any webhook so `getUpdates` can be used.
    pub async fn delete_webhook(&self) -> Result<(), ChatError> {
        let params = DeleteWebhook {
            drop_pending_updates: false,
        };
        let _: bool = self.call("deleteWebhook", &params, self.timeout).await?;
        Ok(())
    }
}
