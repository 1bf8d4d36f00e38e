//! Wizard state machine.
//!
//! `advance` is a pure function of the session and one input: no IO, no
//! timers, no retries. The conversation service does the downloading and
//! persistence around it.

use chrono::Utc;

use pagesmith_types::page_type::PageType;
use pagesmith_types::session::{FooterText, LogoAsset, Session, WizardState};

/// Longest accepted channel name, in characters.
pub const MAX_CHANNEL_NAME_CHARS: usize = 64;

/// One input to the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardInput {
    Text(String),
    /// A logo that has already been downloaded.
    Logo(LogoAsset),
    /// A page type selection by catalog key (from a button).
    PageType(String),
    /// Yes/no answer to the footer question (from a button).
    FooterChoice(bool),
    Cancel,
    /// Input the wizard cannot use in any state.
    Unsupported,
}

/// Why an input was rejected. The session is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidInput {
    EmptyText,
    NameTooLong,
    ExpectedText,
    ExpectedImage,
    /// The logo could not be downloaded from the chat service.
    DownloadFailed,
    InvalidPageType,
    InvalidFooterChoice,
    /// The session is not collecting input (complete or cancelled).
    NotAccepting,
}

/// Result of feeding one input to the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Moved to a new collecting state.
    Advanced(WizardState),
    /// Every field is collected; the session is now `Complete`.
    Completed,
    Cancelled,
    /// Input rejected; the caller should re-prompt for the same field.
    Reprompt(InvalidInput),
}

/// Apply `input` to `session`.
///
/// Fields are only written on an accepting transition, so a `Reprompt`
/// always leaves the session exactly as it was.
///
/// The channel name is stored trimmed of surrounding whitespace, not verbatim.
pub fn advance(session: &mut Session, input: WizardInput) -> Transition {
    if input == WizardInput::Cancel {
        if session.state == WizardState::Cancelled {
            return Transition::Reprompt(InvalidInput::NotAccepting);
        }
        set_state(session, WizardState::Cancelled);
        return Transition::Cancelled;
    }

    match session.state {
        WizardState::AwaitingChannelName => match input {
            WizardInput::Text(text) => {
                let name = text.trim();
                if name.is_empty() {
                    return Transition::Reprompt(InvalidInput::EmptyText);
                }
                if name.chars().count() > MAX_CHANNEL_NAME_CHARS {
                    return Transition::Reprompt(InvalidInput::NameTooLong);
                }
                session.channel_name = Some(name.to_string());
                advanced(session, WizardState::AwaitingLogo)
            }
            _ => Transition::Reprompt(InvalidInput::ExpectedText),
        },

        WizardState::AwaitingLogo => match input {
            WizardInput::Logo(logo) => {
                session.logo = Some(logo);
                advanced(session, WizardState::AwaitingPageType)
            }
            _ => Transition::Reprompt(InvalidInput::ExpectedImage),
        },

        WizardState::AwaitingPageType => {
            let selected = match &input {
                WizardInput::PageType(key) | WizardInput::Text(key) => PageType::from_key(key),
                _ => None,
            };
            match selected {
                Some(page_type) => {
                    session.page_type = Some(page_type);
                    advanced(session, WizardState::AwaitingFooterChoice)
                }
                None => Transition::Reprompt(InvalidInput::InvalidPageType),
            }
        }

        WizardState::AwaitingFooterChoice => {
            let choice = match &input {
                WizardInput::FooterChoice(choice) => Some(*choice),
                WizardInput::Text(text) => parse_yes_no(text),
                _ => None,
            };
            match choice {
                Some(true) => advanced(session, WizardState::AwaitingFooterText),
                Some(false) => {
                    session.footer = FooterText::Declined;
                    set_state(session, WizardState::Complete);
                    Transition::Completed
                }
                None => Transition::Reprompt(InvalidInput::InvalidFooterChoice),
            }
        }

        WizardState::AwaitingFooterText => match input {
            WizardInput::Text(text) => {
                let footer = text.trim();
                if footer.is_empty() {
                    return Transition::Reprompt(InvalidInput::EmptyText);
                }
                session.footer = FooterText::Provided(footer.to_string());
                set_state(session, WizardState::Complete);
                Transition::Completed
            }
            _ => Transition::Reprompt(InvalidInput::ExpectedText),
        },

        WizardState::Complete | WizardState::Cancelled => {
            Transition::Reprompt(InvalidInput::NotAccepting)
        }
    }
}

/// `yes`/`y`/`no`/`n`, case-insensitive.
fn parse_yes_no(text: &str) -> Option<bool> {
    match text.trim().to_lowercase().as_str() {
        "yes" | "y" => Some(true),
        "no" | "n" => Some(false),
        _ => None,
    }
}

fn advanced(session: &mut Session, state: WizardState) -> Transition {
    set_state(session, state);
    Transition::Advanced(state)
}

fn set_state(session: &mut Session, state: WizardState) {
    session.state = state;
    session.updated_at = Utc::now();
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagesmith_types::session::{ChatId, UserId};

    fn text(s: &str) -> WizardInput {
        WizardInput::Text(s.to_string())
    }

    fn logo() -> WizardInput {
        WizardInput::Logo(LogoAsset {
            source_id: "photo-1".to_string(),
            bytes: vec![1, 2, 3],
        })
    }

    fn session() -> Session {
        Session::new(UserId(1), ChatId(1))
    }

    fn at_footer_choice() -> Session {
        let mut s = session();
        advance(&mut s, text("Night Owls"));
        advance(&mut s, logo());
        advance(&mut s, WizardInput::PageType("3".to_string()));
        assert_eq!(s.state, WizardState::AwaitingFooterChoice);
        s
    }

    #[test]
    fn test_full_walk_with_footer() {
        let mut s = session();

        assert_eq!(
            advance(&mut s, text("  Night Owls  ")),
            Transition::Advanced(WizardState::AwaitingLogo)
        );
        assert_eq!(s.channel_name.as_deref(), Some("Night Owls"));

        assert_eq!(
            advance(&mut s, logo()),
            Transition::Advanced(WizardState::AwaitingPageType)
        );
        assert_eq!(
            advance(&mut s, WizardInput::PageType("5".to_string())),
            Transition::Advanced(WizardState::AwaitingFooterChoice)
        );
        assert_eq!(s.page_type, Some(PageType::Restaurant));

        assert_eq!(
            advance(&mut s, WizardInput::FooterChoice(true)),
            Transition::Advanced(WizardState::AwaitingFooterText)
        );
        assert_eq!(advance(&mut s, text("Acme Corp")), Transition::Completed);
        assert_eq!(s.state, WizardState::Complete);
        assert_eq!(s.footer, FooterText::Provided("Acme Corp".to_string()));

        let request = s.publish_request().unwrap();
        assert_eq!(request.footer_text.as_deref(), Some("Acme Corp"));
        assert!(request.logo.is_some());
    }

    #[test]
    fn test_footer_no_completes_without_footer() {
        let mut s = at_footer_choice();
        assert_eq!(advance(&mut s, text("No")), Transition::Completed);
        assert_eq!(s.footer, FooterText::Declined);
        assert!(s.publish_request().unwrap().footer_text.is_none());
    }

    #[test]
    fn test_footer_choice_text_is_case_insensitive() {
        for (answer, expected) in [("YES", true), ("y", true), (" n ", false), ("nO", false)] {
            let mut s = at_footer_choice();
            let transition = advance(&mut s, text(answer));
            if expected {
                assert_eq!(transition, Transition::Advanced(WizardState::AwaitingFooterText));
            } else {
                assert_eq!(transition, Transition::Completed);
            }
        }
    }

    #[test]
    fn test_footer_choice_rejects_other_text() {
        let mut s = at_footer_choice();
        assert_eq!(
            advance(&mut s, text("maybe")),
            Transition::Reprompt(InvalidInput::InvalidFooterChoice)
        );
        assert_eq!(s.state, WizardState::AwaitingFooterChoice);
        assert_eq!(s.footer, FooterText::NotAsked);
    }

    #[test]
    fn test_empty_channel_name_is_rejected() {
        let mut s = session();
        assert_eq!(
            advance(&mut s, text("   ")),
            Transition::Reprompt(InvalidInput::EmptyText)
        );
        assert_eq!(s.state, WizardState::AwaitingChannelName);
        assert!(s.channel_name.is_none());
    }

    #[test]
    fn test_long_channel_name_is_rejected() {
        let mut s = session();
        let name = "x".repeat(MAX_CHANNEL_NAME_CHARS + 1);
        assert_eq!(
            advance(&mut s, text(&name)),
            Transition::Reprompt(InvalidInput::NameTooLong)
        );

        let name = "é".repeat(MAX_CHANNEL_NAME_CHARS);
        assert_eq!(
            advance(&mut s, text(&name)),
            Transition::Advanced(WizardState::AwaitingLogo)
        );
    }

    #[test]
    fn test_logo_step_requires_image() {
        let mut s = session();
        advance(&mut s, text("c"));
        assert_eq!(
            advance(&mut s, text("here is my logo")),
            Transition::Reprompt(InvalidInput::ExpectedImage)
        );
        assert_eq!(
            advance(&mut s, WizardInput::Unsupported),
            Transition::Reprompt(InvalidInput::ExpectedImage)
        );
        assert_eq!(s.state, WizardState::AwaitingLogo);
        assert!(s.logo.is_none());
    }

    #[test]
    fn test_invalid_page_type_self_loops_without_mutation() {
        let mut s = session();
        advance(&mut s, text("c"));
        advance(&mut s, logo());
        let before = s.clone();

        assert_eq!(
            advance(&mut s, WizardInput::PageType("11".to_string())),
            Transition::Reprompt(InvalidInput::InvalidPageType)
        );
        assert_eq!(s.state, before.state);
        assert_eq!(s.page_type, None);
        assert_eq!(s.updated_at, before.updated_at);
    }

    #[test]
    fn test_page_type_can_be_typed() {
        let mut s = session();
        advance(&mut s, text("c"));
        advance(&mut s, logo());
        assert_eq!(
            advance(&mut s, text(" 10 ")),
            Transition::Advanced(WizardState::AwaitingFooterChoice)
        );
        assert_eq!(s.page_type, Some(PageType::CreativeAgency));
    }

    #[test]
    fn test_cancel_from_every_collecting_state() {
        let steps = [text("c"), logo(), WizardInput::PageType("1".to_string()), WizardInput::FooterChoice(true)];
        for taken in 0..=steps.len() {
            let mut s = session();
            for input in steps.iter().take(taken) {
                advance(&mut s, input.clone());
            }
            assert!(s.state.is_collecting());
            assert_eq!(advance(&mut s, WizardInput::Cancel), Transition::Cancelled);
            assert_eq!(s.state, WizardState::Cancelled);
            assert_eq!(
                advance(&mut s, text("anything")),
                Transition::Reprompt(InvalidInput::NotAccepting)
            );
        }
    }

    #[test]
    fn test_complete_session_rejects_input_but_can_cancel() {
        let mut s = at_footer_choice();
        advance(&mut s, WizardInput::FooterChoice(false));
        assert_eq!(
            advance(&mut s, text("hello")),
            Transition::Reprompt(InvalidInput::NotAccepting)
        );
        assert_eq!(s.state, WizardState::Complete);
        assert_eq!(advance(&mut s, WizardInput::Cancel), Transition::Cancelled);
    }

    #[test]
    fn test_empty_footer_text_is_rejected() {
        let mut s = at_footer_choice();
        advance(&mut s, WizardInput::FooterChoice(true));
        assert_eq!(
            advance(&mut s, text("")),
            Transition::Reprompt(InvalidInput::EmptyText)
        );
        assert_eq!(s.state, WizardState::AwaitingFooterText);
    }
}
