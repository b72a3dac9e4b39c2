//! User Password Value Objects
//!
//! `RawPassword` is the zeroized clear text from the request.
//! `UserPassword` is the stored digest and never leaves the server.

use kernel::validation::FieldErrors;
use platform::password::HashedPassword;

pub use platform::password::ClearTextPassword as RawPassword;

/// Validate a new password and its confirmation
///
/// Problems are recorded in `errors`; `None` means at least one was found.
pub fn new_password_with_confirmation(
    password: String,
    confirmation: &str,
    errors: &mut FieldErrors,
) -> Option<RawPassword> {
    let confirmation_ok = if confirmation.is_empty() {
        errors.push("Password confirmation is required");
        false
    } else if confirmation != password {
        errors.push("Passwords do not match");
        false
    } else {
        true
    };

    let password = errors.check(RawPassword::new(password))?;
    confirmation_ok.then_some(password)
}

/// Stored password digest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    pub fn from_hashed(hashed: HashedPassword) -> Self {
        Self(hashed)
    }

    /// Create from database value
    pub fn from_db(phc: impl Into<String>) -> Self {
        Self(HashedPassword::from_phc_string(phc))
    }

    pub fn as_hashed(&self) -> &HashedPassword {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        self.0.as_phc_string()
    }
}
