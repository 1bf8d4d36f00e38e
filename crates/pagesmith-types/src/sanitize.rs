//! Text-to-identifier normalization for branch names and subdomains.
//!
//! Both sanitizers are pure and deterministic. Their output is always a valid
//! identifier and feeding it back through the same sanitizer returns it
//! unchanged.

/// Prefix added when the normalized text does not start with `[a-z0-9]`.
pub const FALLBACK_PREFIX: &str = "page-";

/// Body used when the input normalizes to nothing at all.
///
/// A bare `page-` would lose its trailing hyphen on a second pass, so the
/// empty case gets a body of its own.
const EMPTY_BODY: &str = "untitled";

/// Normalize arbitrary text into a git branch name.
///
/// Rules:
/// - Lowercase
/// - Replace every character outside `[a-z0-9-_]` with a hyphen
/// - Collapse consecutive hyphens into one
/// - Trim leading/trailing hyphens
/// - Prefix with `page-` unless the result starts with a letter or digit
///
/// # Examples
///
/// ```
/// use pagesmith_types::sanitize::sanitize_branch_name;
///
/// assert_eq!(sanitize_branch_name("page-My Cool Channel!!"), "page-my-cool-channel");
/// assert_eq!(sanitize_branch_name("_private"), "page-_private");
/// assert_eq!(sanitize_branch_name("!!!"), "page-untitled");
/// ```
pub fn sanitize_branch_name(text: &str) -> String {
    normalize(text, |c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// Normalize arbitrary text into a DNS label for a deploy subdomain.
///
/// Same rules as [`sanitize_branch_name`], but underscores are not allowed
/// because subdomain grammar is stricter.
///
/// ```
/// use pagesmith_types::sanitize::sanitize_subdomain;
///
/// assert_eq!(sanitize_subdomain("My Cool Channel!!"), "my-cool-channel");
/// assert_eq!(sanitize_subdomain("snake_case"), "snake-case");
/// ```
pub fn sanitize_subdomain(text: &str) -> String {
    normalize(text, |c| c.is_ascii_lowercase() || c.is_ascii_digit())
}

fn normalize(text: &str, keep: impl Fn(char) -> bool) -> String {
    let lowered = text.to_lowercase();

    let mut result = String::with_capacity(lowered.len());
    let mut prev_was_hyphen = true; // treat start as hyphen to trim leading
    for c in lowered.chars() {
        if keep(c) {
            result.push(c);
            prev_was_hyphen = false;
        } else if !prev_was_hyphen {
            result.push('-');
            prev_was_hyphen = true;
        }
    }

    // Trim trailing hyphen
    if result.ends_with('-') {
        result.pop();
    }

    if result.is_empty() {
        return format!("{FALLBACK_PREFIX}{EMPTY_BODY}");
    }

    if !result.starts_with(|c: char| c.is_ascii_lowercase() || c.is_ascii_digit()) {
        result.insert_str(0, FALLBACK_PREFIX);
    }

    result
}
