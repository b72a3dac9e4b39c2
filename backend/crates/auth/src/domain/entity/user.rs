//! User Entity
//!
//! Account record: credentials, profile, role and lifecycle flags.

use chrono::{DateTime, TimeDelta, Utc};

use crate::domain::value_object::{
    AvatarUrl, Bio, Email, UserId, UserName, UserPassword, UserRole,
};

/// Base URL for generated initials avatars
const GENERATED_AVATAR_URL: &str = "https://api.dicebear.com/7.x/initials/svg?seed=";

/// User entity
///
/// The password digest is loaded with the user but is never serialized;
/// responses go through the presentation layer's public view.
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    pub name: UserName,
    /// Unique, lowercased
    pub email: Email,
    pub password: UserPassword,
    pub avatar: Option<AvatarUrl>,
    pub bio: Bio,
    pub role: UserRole,
    /// False after self-deletion
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    /// Set whenever the password is rewritten after signup
    pub password_changed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new active user with the default role
    pub fn new(name: UserName, email: Email, password: UserPassword) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            name,
            email,
            password,
            avatar: None,
            bio: Bio::default(),
            role: UserRole::default(),
            is_active: true,
            last_login_at: None,
            password_changed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Record successful login
    pub fn record_login(&mut self, now: DateTime<Utc>) {
        self.last_login_at = Some(now);
        self.updated_at = now;
    }

    /// Replace the password digest and stamp the change
    ///
    /// `changed_at` comes from [`password_changed_timestamp`].
    pub fn set_password(&mut self, password: UserPassword, changed_at: DateTime<Utc>, now: DateTime<Utc>) {
        self.password = password;
        self.password_changed_at = Some(changed_at);
        self.updated_at = now;
    }

    /// True if the password changed after a token issued at `issued_at`
    pub fn password_changed_after(&self, issued_at: i64) -> bool {
        is_token_stale(self.password_changed_at, issued_at)
    }

    /// Soft delete
    pub fn deactivate(&mut self, now: DateTime<Utc>) {
        self.is_active = false;
        self.updated_at = now;
    }

    pub fn apply_profile(&mut self, patch: ProfilePatch, now: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(bio) = patch.bio {
            self.bio = bio;
        }
        if let Some(avatar) = patch.avatar {
            self.avatar = Some(avatar);
        }
        self.updated_at = now;
    }

    /// Avatar URL, or a generated initials image when none is set
    pub fn profile_url(&self) -> String {
        match &self.avatar {
            Some(avatar) => avatar.as_str().to_string(),
            None => {
                let seed: String =
                    url::form_urlencoded::byte_serialize(self.name.as_str().as_bytes()).collect();
                format!("{GENERATED_AVATAR_URL}{seed}")
            }
        }
    }
}

/// Profile fields a user may edit about themselves
///
/// Cannot carry id, email, role, password or activity flags.
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub name: Option<UserName>,
    pub bio: Option<Bio>,
    pub avatar: Option<AvatarUrl>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.bio.is_none() && self.avatar.is_none()
    }
}

// ============================================================================
// Derivations
// ============================================================================

/// `passwordChangedAt` for a change happening at `now`
///
/// Backdated by `backdate`; a token minted in the same request as the
/// change must still pass [`is_token_stale`].
pub fn password_changed_timestamp(now: DateTime<Utc>, backdate: TimeDelta) -> DateTime<Utc> {
    now - backdate
}

/// Freshness check: compares epoch seconds
pub fn is_token_stale(password_changed_at: Option<DateTime<Utc>>, issued_at: i64) -> bool {
    password_changed_at.is_some_and(|changed| changed.timestamp() > issued_at)
}
