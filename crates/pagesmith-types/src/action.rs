//! Button actions and chat commands accepted by the wizard.
//!
//! Actions are the closed set of things a button press can mean. They are
//! encoded into short strings for transports that carry opaque button data
//! (Telegram `callback_data` is limited to 64 bytes).

use serde::{Deserialize, Serialize};

use std::fmt;

/// A button press.
///
/// `SelectPageType` carries the raw key rather than a `PageType` so that a
/// stale or forged key still reaches the state machine, which re-prompts
/// instead of silently dropping the press.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Action {
    /// Show the entry menu.
    Start,
    /// Show the capability list.
    Help,
    /// Begin a new wizard session.
    Generate,
    /// Abort the current session.
    Cancel,
    FooterYes,
    FooterNo,
    SelectPageType(String),
    /// Re-run publishing for a completed session after a failure.
    Retry,
}

impl Action {
    /// Encode into the compact wire form used as button data.
    pub fn encode(&self) -> String {
        match self {
            Action::Start => "start".to_string(),
            Action::Help => "help".to_string(),
            Action::Generate => "generate".to_string(),
            Action::Cancel => "cancel".to_string(),
            Action::FooterYes => "footer:yes".to_string(),
            Action::FooterNo => "footer:no".to_string(),
            Action::SelectPageType(key) => format!("page:{key}"),
            Action::Retry => "retry".to_string(),
        }
    }

    /// Parse button data. Returns `None` for anything not produced by [`Action::encode`].
    pub fn parse(data: &str) -> Option<Action> {
        match data {
            "start" => Some(Action::Start),
            "help" => Some(Action::Help),
            "generate" => Some(Action::Generate),
            "cancel" => Some(Action::Cancel),
            "footer:yes" => Some(Action::FooterYes),
            "footer:no" => Some(Action::FooterNo),
            "retry" => Some(Action::Retry),
            other => other
                .strip_prefix("page:")
                .filter(|key| !key.is_empty())
                .map(|key| Action::SelectPageType(key.to_string())),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// A slash command typed by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Generate,
    Cancel,
}

impl Command {
    /// Parse `/start`, `/help`, `/generate` and `/cancel`.
    ///
    /// Accepts the `/cmd@botname` form used in group chats and ignores any
    /// trailing arguments. Returns `None` if the text is not a known command.
    pub fn parse(text: &str) -> Option<Command> {
        let first = text.trim().split_whitespace().next()?;
        let name = first.strip_prefix('/')?;
        let name = name.split('@').next().unwrap_or(name);

        match name.to_lowercase().as_str() {
            "start" => Some(Command::Start),
            "help" => Some(Command::Help),
            "generate" | "new" => Some(Command::Generate),
            "cancel" => Some(Command::Cancel),
            _ => None,
        }
    }

    /// The button action with the same meaning.
    pub fn as_action(self) -> Action {
        match self {
            Command::Start => Action::Start,
            Command::Help => Action::Help,
            Command::Generate => Action::Generate,
            Command::Cancel => Action::Cancel,
        }
    }
}
