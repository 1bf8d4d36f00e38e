//! Shared domain types for Pagesmith.
//!
//! Sessions, the page-type catalog, button actions, outcomes, tunable
//! settings, the branch/subdomain sanitizers and every error type used
//! across the workspace.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod action;
pub mod config;
pub mod error;
pub mod outcome;
pub mod page_type;
pub mod sanitize;
pub mod session;
