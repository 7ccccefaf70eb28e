use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Back-office role. Carried in the access token next to `admin`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AdminRole {
    SuperAdmin,
    #[default]
    Manager,
}

fn default_true() -> bool {
    true
}

/// Admin entity as stored in the `admins` collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Admin {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub name: String,
    /// Always lower-case
    pub email: String,
    pub password_hash: String,
    #[serde(default)]
    pub role: AdminRole,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Admin {
    pub fn new(name: String, email: String, password_hash: String, role: AdminRole) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name,
            email,
            password_hash,
            role,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Roles put in the access token
    pub fn token_roles(&self) -> Vec<String> {
        vec!["admin".to_string(), self.role.to_string()]
    }
}

/// Admin as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdminResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: AdminRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Admin> for AdminResponse {
    fn from(admin: Admin) -> Self {
        Self {
            id: admin.id,
            name: admin.name,
            email: admin.email,
            role: admin.role,
            is_active: admin.is_active,
            created_at: admin.created_at,
            updated_at: admin.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateAdmin {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, max = 128))]
    pub password: String,
    #[serde(default)]
    pub role: AdminRole,
}

/// A new `password` is re-hashed; other fields are replaced as given.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateAdmin {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub role: Option<AdminRole>,
    pub is_active: Option<bool>,
    #[validate(length(min = 6, max = 128))]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
pub struct AdminFilter {
    pub role: Option<AdminRole>,
    pub is_active: Option<bool>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: u64,
}

fn default_limit() -> i64 {
    50
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AdminLoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Access token for the back office. Admins get no refresh token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdminTokenResponse {
    pub access_token: String,
    /// Always `Bearer`
    pub token_type: String,
    /// Lifetime in seconds
    pub expires_in: i64,
    pub admin: AdminResponse,
}
