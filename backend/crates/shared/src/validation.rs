//! Boundary validation helpers.
//!
//! Request DTOs validate every field and report all problems at once; the
//! messages are joined with `". "` into a single 400 response.

use crate::error::app_error::{AppError, AppResult};

/// Collects field-level validation failures.
///
/// ## Examples
/// ```rust
/// use kernel::validation::FieldErrors;
///
/// let mut errors = FieldErrors::default();
/// let name: Option<String> = errors.check(Err::<String, _>("Name is required"));
/// assert!(name.is_none());
/// errors.push("Passwords do not match");
/// assert_eq!(
///     errors.finish().unwrap_err().message(),
///     "Name is required. Passwords do not match"
/// );
/// ```
#[derive(Debug, Default)]
pub struct FieldErrors {
    messages: Vec<String>,
}

impl FieldErrors {
    pub fn push(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    /// Keep the value on success, record the message on failure.
    pub fn check<T, E: ToString>(&mut self, result: Result<T, E>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.push(e.to_string());
                None
            }
        }
    }

    /// Like [`FieldErrors::check`] for [`AppError`], keeping only the message.
    pub fn check_app<T>(&mut self, result: AppResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.push(e.message().to_string());
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// `Ok(())` if nothing was recorded, otherwise one 400 error.
    pub fn finish(self) -> AppResult<()> {
        if self.messages.is_empty() {
            Ok(())
        } else {
            Err(AppError::bad_request(self.messages.join(". ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_ok() {
        assert!(FieldErrors::default().finish().is_ok());
    }

    #[test]
    fn test_messages_are_joined() {
        let mut errors = FieldErrors::default();
        errors.check_app::<()>(Err(AppError::bad_request("Title is required")));
        errors.push("Tags cannot exceed 10");
        let err = errors.finish().unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.message(), "Title is required. Tags cannot exceed 10");
    }
}
