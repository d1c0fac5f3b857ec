//! Common utilities for the completion client
//!
//! Masking and sanitizing helpers so credentials never reach logs or users.

/// Minimum key length to display partial key
const MIN_KEY_LENGTH_FOR_PARTIAL_DISPLAY: usize = 8;

/// Number of characters to show at start/end of masked key
const KEY_MASK_VISIBLE_CHARS: usize = 4;

/// Sensitive patterns to filter from error messages
const SENSITIVE_PATTERNS: &[&str] = &[
    "api_key",
    "api-key",
    "apikey",
    "x-api-key",
    "authorization",
    "bearer",
    "secret",
    "credential",
];

/// Generic message returned in place of a sensitive one
pub const GENERIC_API_ERROR: &str = "The completion service returned an error. Please try again.";

/// Mask API key for safe display in logs
///
/// # Examples
/// ```
/// use parley_llm::util::mask_api_key;
/// assert_eq!(mask_api_key("sk-ant-1234567890abcdef"), "sk-a...cdef");
/// assert_eq!(mask_api_key("short"), "****");
/// ```
#[must_use]
pub fn mask_api_key(key: &str) -> String {
    if key.len() <= MIN_KEY_LENGTH_FOR_PARTIAL_DISPLAY || !key.is_ascii() {
        return "****".to_string();
    }
    format!(
        "{}...{}",
        &key[..KEY_MASK_VISIBLE_CHARS],
        &key[key.len() - KEY_MASK_VISIBLE_CHARS..]
    )
}

/// Sanitize error message for user display
///
/// # Examples
/// ```
/// use parley_llm::util::{sanitize_error_for_user, GENERIC_API_ERROR};
/// assert_eq!(sanitize_error_for_user("Invalid x-api-key header"), GENERIC_API_ERROR);
/// assert_eq!(sanitize_error_for_user("Connection timeout"), "Connection timeout");
/// ```
#[must_use]
pub fn sanitize_error_for_user(error: &str) -> String {
    let lower = error.to_lowercase();
    if SENSITIVE_PATTERNS.iter().any(|p| lower.contains(p)) {
        return GENERIC_API_ERROR.to_string();
    }
    error.to_string()
}

/// Truncate to at most `max_chars` characters on a char boundary
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
