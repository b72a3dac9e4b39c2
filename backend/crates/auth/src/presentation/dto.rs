//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use kernel::error::app_error::AppResult;
use kernel::page::PageRequest;
use kernel::validation::FieldErrors;
use serde::{Deserialize, Serialize};

use crate::application::UserPage;
use crate::domain::entity::user::{ProfilePatch, User};
use crate::domain::repository::UserFilter;
use crate::domain::value_object::{AvatarUrl, Bio, UserId, UserName, UserRole};

// ============================================================================
// User View
// ============================================================================

/// Public view of a user; the password digest never leaves the server
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub bio: String,
    pub role: UserRole,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    /// Avatar, or a generated initials image when none is set
    pub profile_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.user_id,
            name: user.name.as_str().to_string(),
            email: user.email.as_str().to_string(),
            avatar: user.avatar.as_ref().map(|a| a.as_str().to_string()),
            bio: user.bio.as_str().to_string(),
            role: user.role,
            is_active: user.is_active,
            last_login: user.last_login_at,
            profile_url: user.profile_url(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// `{ user }`
#[derive(Debug, Clone, Serialize)]
pub struct UserEnvelope {
    pub user: UserResponse,
}

impl From<&User> for UserEnvelope {
    fn from(user: &User) -> Self {
        Self { user: user.into() }
    }
}

// ============================================================================
// Sign Up / Sign In
// ============================================================================

/// Sign up request
///
/// Missing fields deserialize as empty and are reported by validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignUpRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

/// Sign in request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// Signup, login and change-password response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub user: UserResponse,
}

// ============================================================================
// Refresh / Sign Out
// ============================================================================

/// Body fallback for clients that cannot send the refresh cookie
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

impl RefreshRequest {
    /// Lenient parse; an empty or malformed body means no token
    pub fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenResponse {
    pub access_token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// ============================================================================
// Change Password
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
    pub new_password_confirm: String,
}

// ============================================================================
// Profile
// ============================================================================

/// `PATCH /users/me` body
///
/// Only `name`, `bio` and `avatar` are applied. `email`, `password` and
/// `role` are accepted by the parser so they can be rejected explicitly.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateMeRequest {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<String>,
    pub email: Option<serde_json::Value>,
    pub password: Option<serde_json::Value>,
    pub role: Option<serde_json::Value>,
}

impl UpdateMeRequest {
    pub fn into_patch(self) -> AppResult<ProfilePatch> {
        let mut errors = FieldErrors::default();

        let name = self.name.and_then(|n| errors.check(UserName::new(n)));
        let bio = self.bio.and_then(|b| errors.check_app(Bio::new(b)));
        let avatar = self.avatar.and_then(|a| errors.check_app(AvatarUrl::new(a)));

        if self.email.is_some() {
            errors.push("Email cannot be updated through this route");
        }
        if self.password.is_some() {
            errors.push("Password cannot be updated through this route");
        }
        if self.role.is_some() {
            errors.push("Role cannot be updated through this route");
        }
        errors.finish()?;

        Ok(ProfilePatch { name, bio, avatar })
    }
}

// ============================================================================
// Admin
// ============================================================================

/// `GET /users` query string
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListUsersQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<String>,
}

impl ListUsersQuery {
    pub fn into_parts(self) -> AppResult<(UserFilter, PageRequest)> {
        let role = self
            .role
            .filter(|r| !r.is_empty())
            .map(|r| r.parse::<UserRole>())
            .transpose()?;

        let filter = UserFilter {
            role,
            is_active: self.is_active.map(|v| v == "true"),
        };
        let page = PageRequest::from_query(self.page.as_deref(), self.limit.as_deref());

        Ok((filter, page))
    }
}

/// `{ users, total, page, pages }`
#[derive(Debug, Clone, Serialize)]
pub struct UserListResponse {
    pub users: Vec<UserResponse>,
    pub total: u64,
    pub page: u32,
    pub pages: u64,
}

impl From<UserPage> for UserListResponse {
    fn from(page: UserPage) -> Self {
        Self {
            users: page.users.iter().map(UserResponse::from).collect(),
            total: page.total,
            page: page.page,
            pages: page.pages,
        }
    }
}
