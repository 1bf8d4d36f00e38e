//! Content generator port.
//!
//! `PageGenerator` is implemented by the Gemini adapter in pagesmith-infra.
//! This module also holds the pure helpers every adapter shares: prompt
//! construction and code-fence stripping.

pub mod prompt;

use std::future::Future;

use pagesmith_types::error::GenerationError;

pub use prompt::GenerationRequest;

/// Trait for page generation backends.
pub trait PageGenerator: Send + Sync {
    /// Whether the credentials this generator needs are present.
    fn is_configured(&self) -> bool;

    /// Generate a page. Makes exactly one attempt.
    ///
    /// Implementations return the bare payload: an enclosing code fence is
    /// removed with [`strip_code_fence`] and empty content is an error.
    fn generate(
        &self,
        request: &GenerationRequest,
    ) -> impl Future<Output = Result<String, GenerationError>> + Send;
}

/// Remove a Markdown code fence wrapped around the whole text.
///
/// Handles an optional language tag on the opening fence (```` ```html ````)
/// and surrounding whitespace. Text that is not fully wrapped is returned
/// trimmed but otherwise untouched.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();

    let Some(after_open) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(inner) = after_open.strip_suffix("```") else {
        return trimmed;
    };

    // Drop the language tag: everything up to the first newline, as long as
    // it looks like a tag rather than content.
    let body = match inner.split_once('\n') {
        Some((tag, rest)) if tag.trim().chars().all(|c| c.is_ascii_alphanumeric()) => rest,
        _ => inner,
    };

    body.trim()
}

/// Apply [`strip_code_fence`] and reject empty output.
pub fn normalize_generated(text: &str) -> Result<String, GenerationError> {
    let body = strip_code_fence(text);
    if body.is_empty() {
        return Err(GenerationError::Empty);
    }
    Ok(body.to_string())
}
