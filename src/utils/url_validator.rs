//! Long URL validation for the shorten endpoint.

use url::Url;

/// Maximum accepted long URL length in bytes.
pub const MAX_URL_LENGTH: usize = 2048;

/// Reasons a long URL is rejected.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlValidationError {
    #[error("URL must not be empty")]
    Empty,

    #[error("URL exceeds {max} characters", max = MAX_URL_LENGTH)]
    TooLong,

    #[error("URL must not contain whitespace or control characters")]
    InvalidCharacter,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must include a host")]
    MissingHost,
}

/// Checks that `input` is a non-empty, absolute `http`/`https` URL with a host.
///
/// The URL is stored exactly as submitted and later sent back verbatim in a
/// `Location` header. [`Url::parse`] silently drops tabs, newlines and
/// surrounding spaces, so input carrying any whitespace or control character
/// is rejected before parsing.
///
/// # Errors
///
/// Returns the first [`UrlValidationError`] that applies.
pub fn validate_long_url(input: &str) -> Result<(), UrlValidationError> {
    if input.trim().is_empty() {
        return Err(UrlValidationError::Empty);
    }

    if input.len() > MAX_URL_LENGTH {
        return Err(UrlValidationError::TooLong);
    }

    if input.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(UrlValidationError::InvalidCharacter);
    }

    let url = Url::parse(input).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlValidationError::UnsupportedProtocol),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_http_and_https() {
        assert!(validate_long_url("http://example.com").is_ok());
        assert!(validate_long_url("https://example.com/path?q=1#frag").is_ok());
        assert!(validate_long_url("https://sub.example.com:8443/a/b").is_ok());
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(validate_long_url(""), Err(UrlValidationError::Empty));
        assert_eq!(validate_long_url("   "), Err(UrlValidationError::Empty));
    }

    #[test]
    fn test_rejects_relative() {
        assert!(matches!(
            validate_long_url("/just/a/path"),
            Err(UrlValidationError::InvalidFormat(_))
        ));
        assert!(matches!(
            validate_long_url("example.com"),
            Err(UrlValidationError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_rejects_other_schemes() {
        for input in ["ftp://example.com", "javascript:alert(1)", "mailto:a@b.c"] {
            assert_eq!(
                validate_long_url(input),
                Err(UrlValidationError::UnsupportedProtocol)
            );
        }
    }

    #[test]
    fn test_rejects_whitespace_and_control_characters() {
        for input in [
            "https://example.com/a\nb",
            "https://example.com/a\tb",
            "https://example.com/a\rb",
            "  https://example.com/lead",
            "https://example.com/trail ",
            "https://example.com/a b",
            "https://example.com/\u{7f}",
        ] {
            assert_eq!(
                validate_long_url(input),
                Err(UrlValidationError::InvalidCharacter),
                "input: {input:?}"
            );
        }
    }

    #[test]
    fn test_accepts_percent_encoded_whitespace() {
        assert!(validate_long_url("https://example.com/a%20b?q=%0A").is_ok());
    }

    #[test]
    fn test_rejects_too_long() {
        let input = format!("https://example.com/{}", "a".repeat(MAX_URL_LENGTH));
        assert_eq!(validate_long_url(&input), Err(UrlValidationError::TooLong));
    }
}
