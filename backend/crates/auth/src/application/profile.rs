//! Profile Use Cases
//!
//! Self-service reads and updates of the caller's own account.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::entity::user::{ProfilePatch, User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::UserId;
use crate::error::{AuthError, AuthResult};

/// Fetch the caller's current record
pub struct GetProfileUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> GetProfileUseCase<U>
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

/// Apply a validated profile patch
pub struct UpdateProfileUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> UpdateProfileUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self, user_id: &UserId, patch: ProfilePatch) -> AuthResult<User> {
        if patch.is_empty() {
            return Err(AuthError::Validation(
                "No valid fields provided for update.".to_string(),
            ));
        }

        let user = self
            .user_repo
            .update_profile(user_id, &patch, Utc::now())
            .await?
            .ok_or(AuthError::UserNotFound)?;

        tracing::info!(user_id = %user.user_id, "Profile updated");

        Ok(user)
    }
}

/// Soft-delete the caller's account
pub struct DeactivateAccountUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> DeactivateAccountUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self, user_id: &UserId) -> AuthResult<()> {
        if self.user_repo.find_by_id(user_id).await?.is_none() {
            return Err(AuthError::UserNotFound);
        }

        self.user_repo.deactivate(user_id, Utc::now()).await?;

        tracing::info!(user_id = %user_id, "Account deactivated");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{Bio, Email, UserName, UserPassword};
    use crate::infra::memory::InMemoryUserRepository;

    async fn seeded() -> (Arc<InMemoryUserRepository>, User) {
        let repo = Arc::new(InMemoryUserRepository::new());
        let user = User::new(
            UserName::new("Ada").unwrap(),
            Email::new("ada@example.com").unwrap(),
            UserPassword::from_db("$argon2id$v=19$m=8,t=1,p=1$c2FsdA$aGFzaA"),
        );
        repo.create(&user).await.unwrap();
        (repo, user)
    }

    fn bio(text: &str) -> ProfilePatch {
        ProfilePatch {
            bio: Some(Bio::new(text).unwrap()),
            ..ProfilePatch::default()
        }
    }

    #[tokio::test]
    async fn test_update_after_deactivate_keeps_account_inactive() {
        let (repo, user) = seeded().await;

        DeactivateAccountUseCase::new(repo.clone())
            .execute(&user.user_id)
            .await
            .unwrap();
        let updated = UpdateProfileUseCase::new(repo.clone())
            .execute(&user.user_id, bio("Back again"))
            .await
            .unwrap();

        assert_eq!(updated.bio.as_str(), "Back again");
        assert!(!updated.is_active);
    }

    #[tokio::test]
    async fn test_update_preserves_password_change() {
        let (repo, user) = seeded().await;
        let now = Utc::now();
        repo.set_password(&user.user_id, &UserPassword::from_db("rotated"), now, now)
            .await
            .unwrap();

        let updated = UpdateProfileUseCase::new(repo)
            .execute(&user.user_id, bio("Mathematician"))
            .await
            .unwrap();
        assert_eq!(updated.password.as_str(), "rotated");
        assert_eq!(updated.password_changed_at, Some(now));
    }

    #[tokio::test]
    async fn test_empty_patch_and_missing_user() {
        let (repo, _) = seeded().await;
        let use_case = UpdateProfileUseCase::new(repo.clone());

        let empty = use_case
            .execute(&UserId::new(), ProfilePatch::default())
            .await
            .unwrap_err();
        assert_eq!(empty.to_string(), "No valid fields provided for update.");

        assert!(matches!(
            use_case.execute(&UserId::new(), bio("Ghost")).await,
            Err(AuthError::UserNotFound)
        ));
        assert!(matches!(
            DeactivateAccountUseCase::new(repo).execute(&UserId::new()).await,
            Err(AuthError::UserNotFound)
        ));
    }
}
