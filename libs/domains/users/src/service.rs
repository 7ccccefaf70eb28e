use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{UpdateUser, UserFilter, UserResponse};
use crate::repository::{SessionRepository, UserRepository};

/// Profile management for existing accounts
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn SessionRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, sessions: Arc<dyn SessionRepository>) -> Self {
        Self { users, sessions }
    }

    pub async fn get_user(&self, id: Uuid) -> UserResult<UserResponse> {
        let user = self
            .users
            .get_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))?;

        Ok(user.into())
    }

    pub async fn list_users(&self, filter: UserFilter) -> UserResult<(Vec<UserResponse>, u64)> {
        let total = self.users.count(filter.clone()).await?;
        let users = self.users.list(filter).await?;
        Ok((users.into_iter().map(Into::into).collect(), total))
    }

    #[instrument(skip(self, input))]
    pub async fn update_user(&self, id: Uuid, input: UpdateUser) -> UserResult<UserResponse> {
        let mut user = self
            .users
            .get_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))?;

        user.apply_update(input);

        let updated = self.users.update(user).await?;
        Ok(updated.into())
    }

    /// Delete the account and revoke every refresh session it holds
    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: Uuid) -> UserResult<()> {
        if !self.users.delete(id).await? {
            return Err(UserError::NotFound(id));
        }

        let revoked = self.sessions.revoke_all_for_user(id).await?;
        tracing::info!(user_id = %id, revoked, "User removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;
    use crate::repository::{MockSessionRepository, MockUserRepository};

    fn user() -> User {
        User::new("Mona".into(), "mona@example.com".into(), "hash".into())
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut users = MockUserRepository::new();
        users.expect_get_by_id().returning(|_| Ok(None));

        let service = UserService::new(Arc::new(users), Arc::new(MockSessionRepository::new()));
        let result = service.get_user(Uuid::now_v7()).await;

        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_user_applies_profile_changes() {
        let existing = user();
        let id = existing.id;

        let mut users = MockUserRepository::new();
        users
            .expect_get_by_id()
            .returning(move |_| Ok(Some(existing.clone())));
        users.expect_update().returning(Ok);

        let service = UserService::new(Arc::new(users), Arc::new(MockSessionRepository::new()));
        let updated = service
            .update_user(
                id,
                UpdateUser {
                    name: Some("Mona Z".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Mona Z");
        assert_eq!(updated.email, "mona@example.com");
    }

    #[tokio::test]
    async fn test_delete_user_revokes_sessions() {
        let id = Uuid::now_v7();

        let mut users = MockUserRepository::new();
        users.expect_delete().returning(|_| Ok(true));
        let mut sessions = MockSessionRepository::new();
        sessions
            .expect_revoke_all_for_user()
            .withf(move |user_id| *user_id == id)
            .times(1)
            .returning(|_| Ok(2));

        let service = UserService::new(Arc::new(users), Arc::new(sessions));
        service.delete_user(id).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_missing_user_is_not_found() {
        let mut users = MockUserRepository::new();
        users.expect_delete().returning(|_| Ok(false));
        let mut sessions = MockSessionRepository::new();
        sessions.expect_revoke_all_for_user().never();

        let service = UserService::new(Arc::new(users), Arc::new(sessions));
        let result = service.delete_user(Uuid::now_v7()).await;

        assert!(matches!(result, Err(UserError::NotFound(_))));
    }
}
