//! In-memory wizard sessions.

pub mod store;

pub use store::SessionStore;
