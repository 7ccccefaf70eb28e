use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AdminResult;
use crate::models::{Admin, AdminFilter};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminRepository: Send + Sync {
    /// Insert; a taken email is [`crate::AdminError::EmailTaken`]
    async fn create(&self, admin: Admin) -> AdminResult<Admin>;

    async fn get_by_id(&self, id: Uuid) -> AdminResult<Option<Admin>>;

    /// Lookup by lower-cased email
    async fn get_by_email(&self, email: &str) -> AdminResult<Option<Admin>>;

    async fn list(&self, filter: AdminFilter) -> AdminResult<Vec<Admin>>;

    async fn update(&self, admin: Admin) -> AdminResult<Admin>;

    async fn delete(&self, id: Uuid) -> AdminResult<bool>;
}
