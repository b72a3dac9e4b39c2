//! Admin Use Cases
//!
//! User directory for the admin role.

use std::sync::Arc;

use kernel::page::PageRequest;

use crate::domain::entity::user::User;
use crate::domain::repository::{UserFilter, UserRepository};
use crate::domain::value_object::UserId;
use crate::error::{AuthError, AuthResult};

/// One page of the user directory
#[derive(Debug, Clone)]
pub struct UserPage {
    pub users: Vec<User>,
    pub total: u64,
    pub page: u32,
    pub pages: u64,
}

/// List users use case
pub struct ListUsersUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> ListUsersUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self, filter: UserFilter, page: PageRequest) -> AuthResult<UserPage> {
        let (users, total) = tokio::try_join!(
            self.user_repo.list(&filter, &page),
            self.user_repo.count(&filter),
        )?;

        Ok(UserPage {
            users,
            total,
            page: page.page(),
            pages: page.total_pages(total),
        })
    }
}

/// Get user by ID use case
pub struct GetUserUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> GetUserUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self, user_id: &UserId) -> AuthResult<User> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }
}
