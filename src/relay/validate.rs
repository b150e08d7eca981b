//! Input checks shared by the HTTP and CLI relays

use super::error::{RelayError, ValidationError};

/// Default cap on chat message length, in UTF-16 code units
pub const MAX_MESSAGE_CHARS: usize = 4000;

/// Accept any content type that mentions `application/json`
pub fn require_json_content_type(content_type: Option<&str>) -> Result<(), ValidationError> {
    match content_type {
        Some(value) if value.contains("application/json") => Ok(()),
        _ => Err(ValidationError::ExpectedJson),
    }
}

/// Strip leading and trailing whitespace, including the byte order mark.
///
/// Matches the JavaScript `String.prototype.trim` set: Unicode `White_Space`
/// without U+0085, plus U+FEFF.
pub fn trim_message(message: &str) -> &str {
    message.trim_matches(|c: char| c == '\u{FEFF}' || (c.is_whitespace() && c != '\u{0085}'))
}

/// Trim a message and enforce the non-empty and length rules.
///
/// `max_chars` of `None` disables the length cap. Length is counted in UTF-16
/// code units, so a character outside the Basic Multilingual Plane counts twice.
pub fn validate_message(message: &str, max_chars: Option<usize>) -> Result<&str, ValidationError> {
    let trimmed = trim_message(message);
    if trimmed.is_empty() {
        return Err(ValidationError::MissingMessage);
    }
    if let Some(max) = max_chars {
        // Bounded scan: stops counting one past the cap
        if trimmed.encode_utf16().take(max + 1).count() > max {
            return Err(ValidationError::MessageTooLong { max });
        }
    }
    Ok(trimmed)
}

/// Join CLI words into one message; an empty result is a usage error
pub fn message_from_args<S: AsRef<str>>(args: &[S]) -> Result<String, RelayError> {
    let joined = args
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ");
    let message = trim_message(&joined);
    if message.is_empty() {
        return Err(RelayError::Usage("missing message".to_string()));
    }
    Ok(message.to_string())
}
