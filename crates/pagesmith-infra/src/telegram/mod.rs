//! Telegram Bot API transport.
//!
//! - [`client`]: thin JSON client for the Bot API methods Pagesmith uses.
//! - [`update`]: converts raw updates into transport-neutral chat events.
//! - [`transport`]: the [`ChatTransport`](pagesmith_core::chat::ChatTransport)
//!   implementation (replies, inline keyboards, logo downloads).

pub mod client;
pub mod transport;
pub mod types;
pub mod update;

pub use client::TelegramClient;
pub use transport::TelegramTransport;
pub use update::{to_incoming, Incoming};
