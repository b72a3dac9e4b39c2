//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use chrono::{DateTime, Utc};
use kernel::page::PageRequest;

use crate::domain::entity::user::{ProfilePatch, User};
use crate::domain::value_object::{Email, UserId, UserPassword, UserRole};
use crate::error::AuthResult;

/// Admin listing filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
}

impl UserFilter {
    pub fn matches(&self, user: &User) -> bool {
        self.role.is_none_or(|role| user.role == role)
            && self.is_active.is_none_or(|active| user.is_active == active)
    }
}

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert a new user. A taken email yields `AuthError::EmailTaken`,
    /// including when two signups race.
    async fn create(&self, user: &User) -> AuthResult<()>;

    /// Find user by ID (active or not)
    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    /// Find user by normalized email
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// Check if email is registered
    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;

    // Writes below touch only their own columns plus `updated_at`, so
    // concurrent requests on the same user never undo each other.

    /// Stamp `last_login_at`
    async fn record_login(&self, user_id: &UserId, at: DateTime<Utc>) -> AuthResult<()>;

    /// Apply the non-empty fields of `patch`; returns the stored user
    /// afterwards, or `None` if it does not exist
    async fn update_profile(
        &self,
        user_id: &UserId,
        patch: &ProfilePatch,
        at: DateTime<Utc>,
    ) -> AuthResult<Option<User>>;

    /// Replace the password digest and `password_changed_at`
    async fn set_password(
        &self,
        user_id: &UserId,
        password: &UserPassword,
        changed_at: DateTime<Utc>,
        at: DateTime<Utc>,
    ) -> AuthResult<()>;

    /// Soft delete
    async fn deactivate(&self, user_id: &UserId, at: DateTime<Utc>) -> AuthResult<()>;

    /// Grant or revoke admin
    async fn set_role(&self, user_id: &UserId, role: UserRole, at: DateTime<Utc>) -> AuthResult<()>;

    /// Page of users matching `filter`, newest first
    async fn list(&self, filter: &UserFilter, page: &PageRequest) -> AuthResult<Vec<User>>;

    /// Number of users matching `filter`
    async fn count(&self, filter: &UserFilter) -> AuthResult<u64>;
}
