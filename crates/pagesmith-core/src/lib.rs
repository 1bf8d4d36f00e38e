//! Business logic and port trait definitions for Pagesmith.
//!
//! This crate owns the wizard state machine, the session store, the publish
//! orchestrator and the working-copy lock. It defines the "ports" that the
//! infrastructure layer implements (generator, version control, deployer,
//! chat transport). It depends only on `pagesmith-types` -- never on
//! `pagesmith-infra` or any HTTP/process crate.

pub mod chat;
pub mod deploy;
pub mod generator;
pub mod orchestrator;
pub mod publish;
pub mod session;
pub mod wizard;

#[cfg(test)]
pub(crate) mod testing;
