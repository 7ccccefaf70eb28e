use async_trait::async_trait;
use uuid::Uuid;

use crate::error::UserResult;
use crate::models::{Session, User, UserFilter};

/// Persistence for user accounts
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user; a taken email is [`crate::UserError::EmailTaken`]
    async fn create(&self, user: User) -> UserResult<User>;

    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>>;

    /// Lookup by lower-cased email
    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>>;

    async fn get_by_confirmation_token(&self, token: &str) -> UserResult<Option<User>>;

    async fn get_by_reset_token_hash(&self, token_hash: &str) -> UserResult<Option<User>>;

    async fn list(&self, filter: UserFilter) -> UserResult<Vec<User>>;

    async fn count(&self, filter: UserFilter) -> UserResult<u64>;

    /// Replace the stored document with `user`
    async fn update(&self, user: User) -> UserResult<User>;

    async fn delete(&self, id: Uuid) -> UserResult<bool>;

    /// Atomically count one OTP attempt if fewer than `max` were made.
    /// Returns false, leaving the counter alone, once the limit is reached.
    async fn claim_otp_attempt(&self, id: Uuid, max: i32) -> UserResult<bool>;
}

/// Persistence for refresh-token sessions
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create(&self, session: Session) -> UserResult<Session>;

    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<Session>>;

    /// Revoke one session if it is still live. Returns false when it was
    /// already revoked or does not exist.
    async fn revoke(&self, id: Uuid, replaced_by: Option<Uuid>) -> UserResult<bool>;

    /// Revoke every live session of a user; returns how many were revoked
    async fn revoke_all_for_user(&self, user_id: Uuid) -> UserResult<u64>;
}
