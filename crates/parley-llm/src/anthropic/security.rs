//! Security utilities for the Anthropic API

use crate::util::truncate_chars;

/// Longest error message passed through unchanged
const MAX_ERROR_CHARS: usize = 300;

/// Sanitize Anthropic API error messages to prevent leaking sensitive information
pub(crate) fn sanitize_api_error(error: &str) -> String {
    let lower = error.to_lowercase();

    if lower.contains("api key")
        || lower.contains("apikey")
        || lower.contains("invalid key")
        || lower.contains("unauthorized")
        || lower.contains("authentication")
        || lower.contains("x-api-key")
    {
        return "API authentication error. Please check your API key configuration.".to_string();
    }

    if lower.contains("rate limit") || lower.contains("overloaded") {
        return "API rate limit exceeded. Please try again later.".to_string();
    }

    if lower.contains("internal") || lower.contains("server error") {
        return "API server error. Please try again later.".to_string();
    }

    if error.chars().count() > MAX_ERROR_CHARS {
        format!("{}...(truncated)", truncate_chars(error, MAX_ERROR_CHARS))
    } else {
        error.to_string()
    }
}
