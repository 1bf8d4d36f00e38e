//! Webhook server: Bot API updates in, health status out.

pub mod handlers;
pub mod router;
