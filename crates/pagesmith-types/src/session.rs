//! Wizard session types.
//!
//! A `Session` is one user's in-progress wizard. It is created when the user
//! starts the wizard, mutated only by the state machine in `pagesmith-core`,
//! and removed once publishing succeeds or the user cancels.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;

use crate::page_type::PageType;

/// Identity of the user who owns a session (the Session Store key).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The conversation replies are delivered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatId(pub i64);

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position of a session in the wizard.
///
/// ```text
/// AwaitingChannelName -> AwaitingLogo -> AwaitingPageType
///     -> AwaitingFooterChoice -> (AwaitingFooterText) -> Complete
/// ```
///
/// `Cancelled` is reachable from every state before `Complete`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardState {
    AwaitingChannelName,
    AwaitingLogo,
    AwaitingPageType,
    AwaitingFooterChoice,
    AwaitingFooterText,
    Complete,
    Cancelled,
}

impl WizardState {
    /// Whether the session is still collecting input.
    pub fn is_collecting(self) -> bool {
        !matches!(self, WizardState::Complete | WizardState::Cancelled)
    }
}

impl fmt::Display for WizardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WizardState::AwaitingChannelName => "awaiting_channel_name",
            WizardState::AwaitingLogo => "awaiting_logo",
            WizardState::AwaitingPageType => "awaiting_page_type",
            WizardState::AwaitingFooterChoice => "awaiting_footer_choice",
            WizardState::AwaitingFooterText => "awaiting_footer_text",
            WizardState::Complete => "complete",
            WizardState::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// Whether the page gets an "Ads by ..." footer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "status", content = "text", rename_all = "snake_case")]
pub enum FooterText {
    /// The question has not been answered yet.
    #[default]
    NotAsked,
    /// The user chose no footer.
    Declined,
    Provided(String),
}

impl FooterText {
    /// Whether the footer question has been answered either way.
    pub fn is_answered(&self) -> bool {
        !matches!(self, FooterText::NotAsked)
    }

    /// The footer text, if one was provided.
    pub fn text(&self) -> Option<&str> {
        match self {
            FooterText::Provided(text) => Some(text),
            FooterText::NotAsked | FooterText::Declined => None,
        }
    }
}

/// A downloaded logo image.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogoAsset {
    /// Transport-specific reference the image was downloaded from.
    pub source_id: String,
    pub bytes: Vec<u8>,
}

// Logos can be megabytes; keep Debug output readable.
impl fmt::Debug for LogoAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogoAsset")
            .field("source_id", &self.source_id)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// One user's in-progress wizard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub user_id: UserId,
    pub chat_id: ChatId,
    pub state: WizardState,
    pub channel_name: Option<String>,
    pub logo: Option<LogoAsset>,
    pub page_type: Option<PageType>,
    pub footer: FooterText,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// A fresh session waiting for the channel name.
    pub fn new(user_id: UserId, chat_id: ChatId) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            chat_id,
            state: WizardState::AwaitingChannelName,
            channel_name: None,
            logo: None,
            page_type: None,
            footer: FooterText::NotAsked,
            started_at: now,
            updated_at: now,
        }
    }

    /// Build the publish request from the collected fields.
    ///
    /// This is the only way the orchestrator reads a session, so it can never
    /// see a field the wizard has not collected.
    pub fn publish_request(&self) -> Result<PublishRequest, IncompleteSession> {
        let channel_name = self
            .channel_name
            .clone()
            .ok_or(IncompleteSession::ChannelName)?;
        let page_type = self.page_type.ok_or(IncompleteSession::PageType)?;
        if !self.footer.is_answered() {
            return Err(IncompleteSession::Footer);
        }

        Ok(PublishRequest {
            channel_name,
            page_type,
            footer_text: self.footer.text().map(str::to_string),
            logo: self.logo.clone(),
        })
    }
}

/// The first required field a session is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IncompleteSession {
    #[error("channel name has not been collected")]
    ChannelName,
    #[error("page type has not been collected")]
    PageType,
    #[error("footer choice has not been collected")]
    Footer,
}

/// Everything the orchestrator needs for one publish attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishRequest {
    pub channel_name: String,
    pub page_type: PageType,
    pub footer_text: Option<String>,
    pub logo: Option<LogoAsset>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(UserId(7), ChatId(70))
    }

    #[test]
    fn test_new_session_awaits_channel_name() {
        let s = session();
        assert_eq!(s.state, WizardState::AwaitingChannelName);
        assert!(s.channel_name.is_none());
        assert_eq!(s.footer, FooterText::NotAsked);
    }

    #[test]
    fn test_publish_request_requires_fields_in_order() {
        let mut s = session();
        assert_eq!(s.publish_request(), Err(IncompleteSession::ChannelName));

        s.channel_name = Some("Daily Bytes".to_string());
        assert_eq!(s.publish_request(), Err(IncompleteSession::PageType));

        s.page_type = Some(PageType::Saas);
        assert_eq!(s.publish_request(), Err(IncompleteSession::Footer));

        s.footer = FooterText::Declined;
        let request = s.publish_request().unwrap();
        assert_eq!(request.channel_name, "Daily Bytes");
        assert_eq!(request.page_type, PageType::Saas);
        assert!(request.footer_text.is_none());
        assert!(request.logo.is_none());
    }

    #[test]
    fn test_publish_request_carries_footer_and_logo() {
        let mut s = session();
        s.channel_name = Some("c".to_string());
        s.page_type = Some(PageType::Fitness);
        s.footer = FooterText::Provided("Acme".to_string());
        s.logo = Some(LogoAsset {
            source_id: "file-1".to_string(),
            bytes: vec![1, 2, 3],
        });

        let request = s.publish_request().unwrap();
        assert_eq!(request.footer_text.as_deref(), Some("Acme"));
        assert_eq!(request.logo.unwrap().bytes, vec![1, 2, 3]);
    }

    #[test]
    fn test_logo_debug_hides_bytes() {
        let logo = LogoAsset {
            source_id: "abc".to_string(),
            bytes: vec![0; 1024],
        };
        let debug = format!("{logo:?}");
        assert!(debug.contains("len: 1024"));
        assert!(!debug.contains("[0, 0"));
    }

    #[test]
    fn test_collecting_states() {
        assert!(WizardState::AwaitingLogo.is_collecting());
        assert!(!WizardState::Complete.is_collecting());
        assert!(!WizardState::Cancelled.is_collecting());
    }
}
