//! In-Memory Repository Implementation
//!
//! Backs the API when no database is configured, and the test suites.

use std::cmp::Reverse;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use kernel::page::PageRequest;
use uuid::Uuid;

use crate::domain::entity::user::{ProfilePatch, User};
use crate::domain::repository::{UserFilter, UserRepository};
use crate::domain::value_object::{Email, UserId, UserPassword, UserRole};
use crate::error::{AuthError, AuthResult};

/// DashMap-backed user repository
#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<DashMap<Uuid, User>>,
    /// Normalized email -> user id; the uniqueness constraint
    by_email: Arc<DashMap<String, Uuid>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn filtered(&self, filter: &UserFilter) -> Vec<User> {
        self.users
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect()
    }
}

impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        match self.by_email.entry(user.email.as_str().to_string()) {
            Entry::Occupied(_) => Err(AuthError::EmailTaken),
            Entry::Vacant(slot) => {
                self.users.insert(*user.user_id.as_uuid(), user.clone());
                slot.insert(*user.user_id.as_uuid());
                Ok(())
            }
        }
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        Ok(self
            .users
            .get(user_id.as_uuid())
            .map(|entry| entry.value().clone()))
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let Some(user_id) = self.by_email.get(email.as_str()).map(|entry| *entry.value()) else {
            return Ok(None);
        };
        Ok(self.users.get(&user_id).map(|entry| entry.value().clone()))
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        Ok(self.by_email.contains_key(email.as_str()))
    }

    async fn record_login(&self, user_id: &UserId, at: DateTime<Utc>) -> AuthResult<()> {
        if let Some(mut stored) = self.users.get_mut(user_id.as_uuid()) {
            stored.record_login(at);
        }
        Ok(())
    }

    async fn update_profile(
        &self,
        user_id: &UserId,
        patch: &ProfilePatch,
        at: DateTime<Utc>,
    ) -> AuthResult<Option<User>> {
        Ok(self.users.get_mut(user_id.as_uuid()).map(|mut stored| {
            stored.apply_profile(patch.clone(), at);
            stored.clone()
        }))
    }

    async fn set_password(
        &self,
        user_id: &UserId,
        password: &UserPassword,
        changed_at: DateTime<Utc>,
        at: DateTime<Utc>,
    ) -> AuthResult<()> {
        if let Some(mut stored) = self.users.get_mut(user_id.as_uuid()) {
            stored.set_password(password.clone(), changed_at, at);
        }
        Ok(())
    }

    async fn deactivate(&self, user_id: &UserId, at: DateTime<Utc>) -> AuthResult<()> {
        if let Some(mut stored) = self.users.get_mut(user_id.as_uuid()) {
            stored.deactivate(at);
        }
        Ok(())
    }

    async fn set_role(&self, user_id: &UserId, role: UserRole, at: DateTime<Utc>) -> AuthResult<()> {
        if let Some(mut stored) = self.users.get_mut(user_id.as_uuid()) {
            stored.role = role;
            stored.updated_at = at;
        }
        Ok(())
    }

    async fn list(&self, filter: &UserFilter, page: &PageRequest) -> AuthResult<Vec<User>> {
        let mut users = self.filtered(filter);
        users.sort_by_key(|user| Reverse((user.created_at, *user.user_id.as_uuid())));

        Ok(users
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect())
    }

    async fn count(&self, filter: &UserFilter) -> AuthResult<u64> {
        Ok(self.filtered(filter).len() as u64)
    }
}
