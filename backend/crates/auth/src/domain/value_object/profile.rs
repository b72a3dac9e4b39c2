//! Profile Value Objects
//!
//! Optional, user-editable profile fields.

use kernel::error::app_error::{AppError, AppResult};
use serde::Serialize;
use url::Url;

/// Maximum bio length (in characters)
pub const BIO_MAX_LENGTH: usize = 300;

/// Free-text bio, trimmed, may be empty
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Bio(String);

impl Bio {
    pub fn new(raw: impl AsRef<str>) -> AppResult<Self> {
        let trimmed = raw.as_ref().trim();
        if trimmed.chars().count() > BIO_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Bio cannot exceed {BIO_MAX_LENGTH} characters"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn from_db(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Absolute http(s) URL of the user's avatar image
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AvatarUrl(String);

impl AvatarUrl {
    pub fn new(raw: impl AsRef<str>) -> AppResult<Self> {
        let invalid = || AppError::bad_request("Avatar must be a valid URL");

        let parsed = Url::parse(raw.as_ref().trim()).map_err(|_| invalid())?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(invalid());
        }
        Ok(Self(parsed.to_string()))
    }

    pub fn from_db(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bio() {
        assert_eq!(Bio::new("  hello  ").unwrap().as_str(), "hello");
        assert!(Bio::new("a".repeat(300)).is_ok());
        let err = Bio::new("a".repeat(301)).unwrap_err();
        assert_eq!(err.message(), "Bio cannot exceed 300 characters");
    }

    #[test]
    fn test_avatar_url() {
        assert!(AvatarUrl::new("https://cdn.example.com/a.png").is_ok());
        assert!(AvatarUrl::new("http://example.com").is_ok());
        assert!(AvatarUrl::new("not a url").is_err());
        assert!(AvatarUrl::new("javascript:alert(1)").is_err());
        assert!(AvatarUrl::new("ftp://example.com/a.png").is_err());
    }
}
