//! Git command-line backend for the repository publisher.

pub mod cli;
pub mod credential;

pub use cli::GitCli;
