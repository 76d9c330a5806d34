//! Input sanitization functions
//!
//! Free-text fields are cleaned before they are validated and stored. Codes
//! and identity numbers are left alone here; their normalization belongs to
//! the registration pipeline.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Pattern to match multiple whitespace characters
    static ref MULTI_WHITESPACE: Regex = Regex::new(r"\s+").unwrap();

    /// Pattern to match control characters (except newline and tab)
    static ref CONTROL_CHARS: Regex = Regex::new(r"[\x00-\x08\x0B\x0C\x0E-\x1F\x7F]").unwrap();
}

/// Trim leading and trailing whitespace from a string
pub fn trim(value: &str) -> String {
    value.trim().to_string()
}

/// Trim a string in-place (modifies Option<String>)
pub fn trim_optional(value: &mut Option<String>) {
    if let Some(ref mut s) = value {
        *s = s.trim().to_string();
    }
}

/// Normalize whitespace: collapse multiple spaces/newlines into single space
pub fn normalize_whitespace(value: &str) -> String {
    MULTI_WHITESPACE.replace_all(value.trim(), " ").to_string()
}

/// Remove control characters from a string
pub fn remove_control_chars(value: &str) -> String {
    CONTROL_CHARS.replace_all(value, "").to_string()
}

/// Sanitize a name or address field: drop control chars, collapse whitespace
pub fn sanitize_text(value: &str) -> String {
    normalize_whitespace(&remove_control_chars(value))
}

/// Sanitize an optional free-text field in place
pub fn sanitize_text_optional(value: &mut Option<String>) {
    if let Some(ref mut s) = value {
        *s = sanitize_text(s);
    }
}
