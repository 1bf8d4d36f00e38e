//! Bounding remote error bodies before they reach errors and logs.

/// Longest error body kept for diagnostics.
pub const MAX_ERROR_BODY: usize = 512;

/// Cut `body` to at most [`MAX_ERROR_BODY`] bytes on a char boundary.
pub fn truncate_error_body(mut body: String) -> String {
    if body.len() > MAX_ERROR_BODY {
        let cut = (0..=MAX_ERROR_BODY)
            .rev()
            .find(|i| body.is_char_boundary(*i))
            .unwrap_or(0);
        body.truncate(cut);
    }
    body
}
