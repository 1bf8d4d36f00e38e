//! Replies sent by the conversation service.
//!
//! Wording lives here and nowhere else, so the service and the tests share
//! one source of truth.

use pagesmith_types::action::Action;
use pagesmith_types::error::{PipelineError, PipelineStage};
use pagesmith_types::outcome::Outcome;
use pagesmith_types::page_type::PageType;
use pagesmith_types::session::{Session, WizardState};

use crate::chat::{Button, Reply};

use super::machine::{InvalidInput, MAX_CHANNEL_NAME_CHARS};

/// Entry menu, shown for `/start` and to users without a session.
pub fn welcome() -> Reply {
    Reply::text(
        "Welcome to Pagesmith!\n\n\
         I build a landing page for your channel from a few answers, publish it \
         to its own branch and deploy it.\n\n\
         Press \"Create landing page\" to begin.",
    )
    .with_button(Button::action("Create landing page", Action::Generate))
    .with_button(Button::action("Help", Action::Help))
}

pub fn help() -> Reply {
    let mut text = String::from(
        "Commands:\n\
         /start - main menu\n\
         /generate - create a new landing page\n\
         /cancel - abort the current page\n\
         /help - this message\n\n\
         I will ask for the channel name, a logo image, a page type and an \
         optional \"Ads by\" footer.\n\nPage types:\n",
    );
    for page_type in PageType::ALL {
        text.push_str(&format!("{}. {}\n", page_type.key(), page_type.title()));
    }
    Reply::text(text).with_button(Button::action("Create landing page", Action::Generate))
}

/// Shown when a user with no session sends wizard input.
pub fn no_session() -> Reply {
    let mut reply = welcome();
    reply.text = "There is no page in progress.".to_string();
    reply
}

pub fn ask_channel_name() -> Reply {
    Reply::text("What is the name of your channel?")
        .with_button(Button::action("Cancel", Action::Cancel))
}

pub fn ask_logo(channel_name: &str) -> Reply {
    Reply::text(format!(
        "Got it: {channel_name}.\n\nNow send the channel logo as a photo or an image file."
    ))
    .with_button(Button::action("Cancel", Action::Cancel))
}

/// The page type catalog, two buttons per row.
pub fn ask_page_type() -> Reply {
    let mut text = String::from("Logo saved. Pick a page type:\n\n");
    for page_type in PageType::ALL {
        text.push_str(&format!("{}. {}\n", page_type.key(), page_type));
    }

    let mut reply = Reply::text(text);
    for pair in PageType::ALL.chunks(2) {
        reply.buttons.push(
            pair.iter()
                .map(|page_type| {
                    Button::action(
                        format!("{}. {}", page_type.key(), page_type.title()),
                        Action::SelectPageType(page_type.key().to_string()),
                    )
                })
                .collect(),
        );
    }
    reply.with_button(Button::action("Cancel", Action::Cancel))
}

pub fn ask_footer_choice() -> Reply {
    let mut reply = Reply::text("Add an \"Ads by ...\" footer to the page? (yes/no)");
    reply.buttons.push(vec![
        Button::action("Yes", Action::FooterYes),
        Button::action("No", Action::FooterNo),
    ]);
    reply
}

pub fn ask_footer_text() -> Reply {
    Reply::text("What should the footer say after \"Ads by\"?")
        .with_button(Button::action("Cancel", Action::Cancel))
}

/// Shown while a complete session waits for a retry.
pub fn awaiting_retry() -> Reply {
    Reply::text("This page is ready to publish. Retry, or cancel to start over.")
        .with_button(Button::action("Retry", Action::Retry))
        .with_button(Button::action("Cancel", Action::Cancel))
}

/// The question for the state a session is in.
pub fn prompt_for(session: &Session) -> Reply {
    match session.state {
        WizardState::AwaitingChannelName => ask_channel_name(),
        WizardState::AwaitingLogo => ask_logo(session.channel_name.as_deref().unwrap_or_default()),
        WizardState::AwaitingPageType => ask_page_type(),
        WizardState::AwaitingFooterChoice => ask_footer_choice(),
        WizardState::AwaitingFooterText => ask_footer_text(),
        WizardState::Complete => awaiting_retry(),
        WizardState::Cancelled => no_session(),
    }
}

/// Explain a rejected input and repeat the question.
pub fn reprompt(reason: InvalidInput, session: &Session) -> Reply {
    let explanation = match reason {
        InvalidInput::EmptyText => "That was empty.".to_string(),
        InvalidInput::NameTooLong => {
            format!("Channel names are limited to {MAX_CHANNEL_NAME_CHARS} characters.")
        }
        InvalidInput::ExpectedText => "Please answer with text.".to_string(),
        InvalidInput::ExpectedImage => "Please send a valid image file.".to_string(),
        InvalidInput::DownloadFailed => {
            "I could not download that image. Please send it again.".to_string()
        }
        InvalidInput::InvalidPageType => {
            "That is not one of the page types. Pick a number from 1 to 10.".to_string()
        }
        InvalidInput::InvalidFooterChoice => "Please reply with 'yes' or 'no'.".to_string(),
        InvalidInput::NotAccepting => return prompt_for(session),
    };

    let mut reply = prompt_for(session);
    reply.text = format!("{explanation}\n\n{}", reply.text);
    reply
}

pub fn working() -> Reply {
    Reply::text("Creating your landing page... This may take a moment.")
}

pub fn cancelled() -> Reply {
    Reply::text("Landing page creation cancelled.")
        .with_button(Button::action("Create landing page", Action::Generate))
}

pub fn nothing_to_cancel() -> Reply {
    Reply::text("Nothing to cancel.")
        .with_button(Button::action("Create landing page", Action::Generate))
}

/// Report the result of a publish attempt.
pub fn outcome(outcome: &Outcome) -> Reply {
    match outcome {
        Outcome::FullSuccess {
            url,
            branch,
            page_type,
        } => Reply::text(format!(
            "Your {} landing page is live!\n\nBranch: {branch}\nURL: {url}",
            page_type.title()
        ))
        .with_button(Button::url("Open page", url.clone()))
        .with_button(Button::action("Create another", Action::Generate)),

        Outcome::PartialSuccess {
            branch, page_type, ..
        } => Reply::text(format!(
            "Your {} landing page was pushed to branch {branch}, but the deploy \
             did not go through. You can deploy the branch manually.",
            page_type.title()
        ))
        .with_button(Button::action("Create another", Action::Generate)),

        Outcome::Failed { stage, error } => failure(*stage, error),
    }
}

fn failure(stage: PipelineStage, error: &PipelineError) -> Reply {
    let text = match error {
        PipelineError::Configuration(_) => {
            return Reply::text(
                "Publishing is not configured on this bot. Please contact the operator.",
            );
        }
        PipelineError::RepositoryUnavailable(_) => "Could not set up the page repository.",
        PipelineError::Generation(_) => "Failed to generate the landing page.",
        PipelineError::GitOperation(_) => "Failed to push the page to the repository.",
        PipelineError::Timeout { .. } => match stage {
            PipelineStage::Generation => "Generating the page took too long.",
            _ => "The repository did not respond in time.",
        },
    };

    Reply::text(format!("{text} Your answers are kept; press Retry to try again."))
        .with_button(Button::action("Retry", Action::Retry))
        .with_button(Button::action("Cancel", Action::Cancel))
}
