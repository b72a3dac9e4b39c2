//! Task Title / Description

use serde::Serialize;
use std::fmt;

use kernel::error::app_error::{AppError, AppResult};

/// Maximum title length (in characters)
pub const TITLE_MAX_LENGTH: usize = 100;

/// Maximum description length (in characters)
pub const DESCRIPTION_MAX_LENGTH: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleError {
    Empty,
    TooLong,
}

impl fmt::Display for TitleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TitleError::Empty => f.write_str("Task title is required"),
            TitleError::TooLong => {
                write!(f, "Title cannot exceed {TITLE_MAX_LENGTH} characters")
            }
        }
    }
}

impl std::error::Error for TitleError {}

/// Trimmed, 1 to 100 characters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TaskTitle(String);

impl TaskTitle {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, TitleError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TitleError::Empty);
        }
        if trimmed.chars().count() > TITLE_MAX_LENGTH {
            return Err(TitleError::TooLong);
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

/// Trimmed, at most 1000 characters, may be empty
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TaskDescription(String);

impl TaskDescription {
    pub fn new(raw: impl AsRef<str>) -> AppResult<Self> {
        let trimmed = raw.as_ref().trim();
        if trimmed.chars().count() > DESCRIPTION_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Description cannot exceed {DESCRIPTION_MAX_LENGTH} characters"
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_trimmed() {
        assert_eq!(TaskTitle::new("  Ship  ").unwrap().as_str(), "Ship");
    }

    #[test]
    fn test_title_bounds() {
        assert_eq!(TaskTitle::new("   "), Err(TitleError::Empty));
        assert!(TaskTitle::new("a".repeat(TITLE_MAX_LENGTH)).is_ok());
        assert_eq!(
            TaskTitle::new("a".repeat(TITLE_MAX_LENGTH + 1)),
            Err(TitleError::TooLong)
        );
        assert_eq!(
            TitleError::TooLong.to_string(),
            "Title cannot exceed 100 characters"
        );
    }

    #[test]
    fn test_description_bounds() {
        assert_eq!(TaskDescription::new("").unwrap().as_str(), "");
        assert!(TaskDescription::new("é".repeat(DESCRIPTION_MAX_LENGTH)).is_ok());
        assert_eq!(
            TaskDescription::new("x".repeat(DESCRIPTION_MAX_LENGTH + 1))
                .unwrap_err()
                .message(),
            "Description cannot exceed 1000 characters"
        );
    }
}
