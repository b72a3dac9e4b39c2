//! Password Hashing and Verification
//!
//! - Argon2id hashing with a configurable cost
//! - Zeroization of clear text on drop
//! - Verification never errors: a malformed digest simply does not match
//!
//! Hashing is CPU-bound, so the async helpers run it on the blocking pool.

use std::fmt;

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::SaltString,
};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop};

// ============================================================================
// Constants
// ============================================================================

/// Minimum password length
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length
pub const MAX_PASSWORD_LENGTH: usize = 128;

// ============================================================================
// Error Types
// ============================================================================

/// Password policy violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password must be at least {min} characters")]
    TooShort { min: usize },

    #[error("Password must be at most {max} characters")]
    TooLong { max: usize },

    #[error("Password is required")]
    EmptyOrWhitespace,

    #[error("Password contains invalid control characters")]
    InvalidCharacter,

    #[error("Password must contain at least one uppercase letter, one lowercase letter, and one number")]
    MissingCharacterClass,
}

/// Password hashing errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Invalid Argon2 parameters: {0}")]
    InvalidParams(String),

    #[error("Hashing task was cancelled")]
    Cancelled,
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// Does not implement `Clone`; Debug output is redacted.
///
/// ## Examples
/// ```rust
/// use platform::password::ClearTextPassword;
///
/// assert!(ClearTextPassword::new("Passw0rd1".to_string()).is_ok());
/// assert!(ClearTextPassword::new("password1".to_string()).is_err());
/// ```
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Create a new password that satisfies the account policy
    ///
    /// - 8..=128 characters (Unicode code points, after NFKC)
    /// - no control characters
    /// - at least one lowercase letter, one uppercase letter and one digit
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        let password = Self::unchecked(raw);
        let normalized = password.0.as_str();

        if normalized.trim().is_empty() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }

        let char_count = normalized.chars().count();
        if char_count < MIN_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: MIN_PASSWORD_LENGTH,
            });
        }
        if char_count > MAX_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_LENGTH,
            });
        }

        if normalized
            .chars()
            .any(|ch| ch.is_control() && ch != '\t' && ch != '\n')
        {
            return Err(PasswordPolicyError::InvalidCharacter);
        }

        let has_lower = normalized.chars().any(char::is_lowercase);
        let has_upper = normalized.chars().any(char::is_uppercase);
        let has_digit = normalized.chars().any(|c| c.is_ascii_digit());
        if !(has_lower && has_upper && has_digit) {
            return Err(PasswordPolicyError::MissingCharacterClass);
        }

        Ok(password)
    }

    /// Wrap a password without applying the policy
    ///
    /// Used for credentials presented at login, which are only ever compared
    /// against a stored digest.
    pub fn unchecked(raw: String) -> Self {
        let normalized: String = raw.nfkc().collect();
        let mut raw = raw;
        raw.zeroize();
        Self(normalized)
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Plaintext equality, used to reject "new password == current password"
    pub fn same_as(&self, other: &ClearTextPassword) -> bool {
        self.0 == other.0
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// Argon2id digest in PHC string format
///
/// Loaded from storage without validation; [`PasswordHashing::verify`]
/// treats an unparsable digest as a mismatch.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    pub fn from_phc_string(s: impl Into<String>) -> Self {
        Self { hash: s.into() }
    }

    pub fn as_phc_string(&self) -> &str {
        &self.hash
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Hasher
// ============================================================================

/// Argon2id cost parameters
///
/// `cost` is the number of iterations (t_cost). Defaults follow the OWASP
/// recommendation m=19456 KiB, t=2, p=1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordHashConfig {
    pub cost: u32,
    pub memory_kib: u32,
    pub parallelism: u32,
}

impl Default for PasswordHashConfig {
    fn default() -> Self {
        Self {
            cost: 2,
            memory_kib: 19_456,
            parallelism: 1,
        }
    }
}

impl PasswordHashConfig {
    /// Smallest parameters Argon2 accepts. Only suitable for tests.
    pub fn minimal() -> Self {
        Self {
            cost: 1,
            memory_kib: argon2::Params::MIN_M_COST,
            parallelism: 1,
        }
    }
}

/// Clear text behind [`PasswordHashing::decoy`]; never a valid account password
const DECOY_PASSWORD: &str = "decoy-password-for-unknown-accounts";

/// Salted adaptive password hashing
#[derive(Debug, Clone)]
pub struct PasswordHashing {
    config: PasswordHashConfig,
    decoy: HashedPassword,
}

impl PasswordHashing {
    /// Validate the parameters once so hashing cannot fail on them later.
    pub fn new(config: PasswordHashConfig) -> Result<Self, PasswordHashError> {
        let mut hashing = Self {
            config,
            decoy: HashedPassword::from_phc_string(""),
        };
        hashing.decoy = hashing.hash(&ClearTextPassword::unchecked(DECOY_PASSWORD.to_string()))?;
        Ok(hashing)
    }

    pub fn config(&self) -> &PasswordHashConfig {
        &self.config
    }

    /// Digest with the configured cost that no presented password matches
    ///
    /// Verifying against it when no account exists keeps the miss path as
    /// slow as a wrong password.
    pub fn decoy(&self) -> &HashedPassword {
        &self.decoy
    }

    fn argon2(&self) -> Result<Argon2<'static>, PasswordHashError> {
        let params = Params::new(
            self.config.memory_kib,
            self.config.cost,
            self.config.parallelism,
            None,
        )
        .map_err(|e| PasswordHashError::InvalidParams(e.to_string()))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    /// Hash with a fresh 128-bit salt
    pub fn hash(&self, password: &ClearTextPassword) -> Result<HashedPassword, PasswordHashError> {
        let salt = SaltString::generate(OsRng);
        let hash = self
            .argon2()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

        Ok(HashedPassword::from_phc_string(hash.to_string()))
    }

    /// Constant-time verification; `false` for malformed digests
    ///
    /// Parameters are read from the digest itself, so hashes produced with an
    /// older cost still verify.
    pub fn verify(&self, password: &ClearTextPassword, hashed: &HashedPassword) -> bool {
        let Ok(parsed) = PasswordHash::new(hashed.as_phc_string()) else {
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }

    /// [`PasswordHashing::hash`] on the blocking thread pool
    pub async fn hash_blocking(
        &self,
        password: ClearTextPassword,
    ) -> Result<HashedPassword, PasswordHashError> {
        let hashing = self.clone();
        tokio::task::spawn_blocking(move || hashing.hash(&password))
            .await
            .map_err(|_| PasswordHashError::Cancelled)?
    }

    /// [`PasswordHashing::verify`] on the blocking thread pool
    pub async fn verify_blocking(
        &self,
        password: ClearTextPassword,
        hashed: HashedPassword,
    ) -> bool {
        let hashing = self.clone();
        tokio::task::spawn_blocking(move || hashing.verify(&password, &hashed))
            .await
            .unwrap_or(false)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn hashing() -> PasswordHashing {
        PasswordHashing::new(PasswordHashConfig::minimal()).unwrap()
    }

    #[test]
    fn test_password_too_short() {
        let result = ClearTextPassword::new("Sh0rt".to_string());
        assert!(matches!(result, Err(PasswordPolicyError::TooShort { .. })));
    }

    #[test]
    fn test_password_too_long() {
        let long_password = format!("Aa1{}", "a".repeat(MAX_PASSWORD_LENGTH));
        let result = ClearTextPassword::new(long_password);
        assert!(matches!(result, Err(PasswordPolicyError::TooLong { .. })));
    }

    #[test]
    fn test_password_whitespace_only() {
        let result = ClearTextPassword::new("        ".to_string());
        assert!(matches!(
            result,
            Err(PasswordPolicyError::EmptyOrWhitespace)
        ));
    }

    #[test]
    fn test_password_requires_each_character_class() {
        for weak in ["alllowercase1", "ALLUPPERCASE1", "NoDigitsHere"] {
            let result = ClearTextPassword::new(weak.to_string());
            assert_eq!(
                result.unwrap_err(),
                PasswordPolicyError::MissingCharacterClass,
                "{weak} should be rejected"
            );
        }
    }

    #[test]
    fn test_valid_password() {
        assert!(ClearTextPassword::new("Passw0rd1".to_string()).is_ok());
        assert!(ClearTextPassword::new("Pässwörter 2024".to_string()).is_ok());
    }

    #[test]
    fn test_hash_and_verify() {
        let hashing = hashing();
        let password = ClearTextPassword::unchecked("Passw0rd1".to_string());
        let hashed = hashing.hash(&password).unwrap();

        assert!(hashed.as_phc_string().starts_with("$argon2id$"));
        assert!(hashing.verify(&password, &hashed));

        let wrong = ClearTextPassword::unchecked("Passw0rd2".to_string());
        assert!(!hashing.verify(&wrong, &hashed));
    }

    #[test]
    fn test_same_password_gets_different_salts() {
        let hashing = hashing();
        let password = ClearTextPassword::unchecked("Passw0rd1".to_string());
        let a = hashing.hash(&password).unwrap();
        let b = hashing.hash(&password).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_malformed_digest_is_false() {
        let hashing = hashing();
        let password = ClearTextPassword::unchecked("Passw0rd1".to_string());
        assert!(!hashing.verify(&password, &HashedPassword::from_phc_string("")));
        assert!(!hashing.verify(
            &password,
            &HashedPassword::from_phc_string("$2b$12$notreallybcrypt")
        ));
    }

    #[test]
    fn test_invalid_params_rejected() {
        let config = PasswordHashConfig {
            cost: 0,
            ..PasswordHashConfig::default()
        };
        assert!(matches!(
            PasswordHashing::new(config),
            Err(PasswordHashError::InvalidParams(_))
        ));
    }

    #[test]
    fn test_decoy_uses_configured_cost() {
        let hashing = hashing();
        let parsed = PasswordHash::new(hashing.decoy().as_phc_string()).unwrap();
        assert_eq!(parsed.params.get_decimal("t"), Some(1));
        assert_eq!(
            parsed.params.get_decimal("m"),
            Some(argon2::Params::MIN_M_COST)
        );

        let password = ClearTextPassword::unchecked("Passw0rd1".to_string());
        assert!(!hashing.verify(&password, hashing.decoy()));
    }

    #[test]
    fn test_same_as() {
        let a = ClearTextPassword::unchecked("Passw0rd1".to_string());
        let b = ClearTextPassword::unchecked("Passw0rd1".to_string());
        let c = ClearTextPassword::unchecked("Passw0rd2".to_string());
        assert!(a.same_as(&b));
        assert!(!a.same_as(&c));
    }

    #[test]
    fn test_debug_redaction() {
        let password = ClearTextPassword::unchecked("secret".to_string());
        let debug_output = format!("{:?}", password);
        assert!(debug_output.contains("REDACTED"));
        assert!(!debug_output.contains("secret"));
    }

    #[tokio::test]
    async fn test_blocking_helpers() {
        let hashing = hashing();
        let hashed = hashing
            .hash_blocking(ClearTextPassword::unchecked("Passw0rd1".to_string()))
            .await
            .unwrap();
        assert!(
            hashing
                .verify_blocking(ClearTextPassword::unchecked("Passw0rd1".to_string()), hashed)
                .await
        );
    }
}
