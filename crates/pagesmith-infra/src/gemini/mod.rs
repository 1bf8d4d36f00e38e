//! Gemini page generator.
//!
//! This module provides the [`GeminiGenerator`] which implements the
//! [`PageGenerator`](pagesmith_core::generator::PageGenerator) trait for the
//! Gemini `generateContent` API.

pub mod client;
pub mod types;

pub use client::GeminiGenerator;
