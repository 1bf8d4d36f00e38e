//! Infrastructure layer for Pagesmith.
//!
//! Implements the ports defined in `pagesmith-core`: the Gemini page
//! generator, the git command-line backend, the Netlify deployer and the
//! Telegram Bot API transport. Also loads credentials and tunables.

pub mod config;
pub mod error_body;
pub mod gemini;
pub mod git;
pub mod netlify;
pub mod telegram;

#[cfg(test)]
pub(crate) mod test_server;
