use crate::utils::error::{FixerError, Result};
use std::fmt::Display;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl Display, reason: impl Into<String>) -> FixerError {
    FixerError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Accepts absolute `http`/`https` URLs only; the model endpoint is joined
/// with an API path later.
pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(invalid(field_name, url_str, "URL cannot be empty"));
    }
    let url = Url::parse(url_str)
        .map_err(|e| invalid(field_name, url_str, format!("Invalid URL format: {}", e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        let reason = format!("Unsupported URL scheme: {}", url.scheme());
        return Err(invalid(field_name, url_str, reason));
    }
    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value >= min_value {
        Ok(())
    } else {
        Err(invalid(field_name, value, format!("Value must be at least {}", min_value)))
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(invalid(field_name, value, "Value cannot be empty or whitespace-only"))
    } else {
        Ok(())
    }
}

pub fn validate_range<T: PartialOrd + Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        let reason = format!("Value must be between {} and {}", min, max);
        Err(invalid(field_name, value, reason))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("gemini_endpoint", "https://example.com").is_ok());
        assert!(validate_url("gemini_endpoint", "http://127.0.0.1:9000").is_ok());
        assert!(validate_url("gemini_endpoint", "").is_err());
        assert!(validate_url("gemini_endpoint", "invalid-url").is_err());
        assert!(validate_url("gemini_endpoint", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("max_upload_mb", 5, 1).is_ok());
        assert!(validate_positive_number("max_upload_mb", 0, 1).is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("workers", 1usize, 1, 64).is_ok());
        assert!(validate_range("workers", 0usize, 1, 64).is_err());
        assert!(validate_range("threads", 2048usize, 1, 1024).is_err());
    }

    #[test]
    fn test_error_names_field_and_value() {
        match validate_range("threads", 0usize, 1, 1024) {
            Err(FixerError::InvalidConfigValueError { field, value, reason }) => {
                assert_eq!(field, "threads");
                assert_eq!(value, "0");
                assert_eq!(reason, "Value must be between 1 and 1024");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("gemini_model", "gemini-1.5-flash").is_ok());
        assert!(validate_non_empty_string("gemini_model", "   ").is_err());
    }
}
