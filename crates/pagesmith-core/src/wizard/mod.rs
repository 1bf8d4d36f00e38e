//! The conversation wizard.
//!
//! - [`machine`]: the pure state machine (`advance`).
//! - [`messages`]: every reply the bot sends.
//! - [`service`]: routes chat events through the machine and the orchestrator.

pub mod machine;
pub mod messages;
pub mod service;

pub use machine::{advance, InvalidInput, Transition, WizardInput, MAX_CHANNEL_NAME_CHARS};
pub use service::ConversationService;
