use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Role every registered shopper starts with
pub const DEFAULT_ROLE: &str = "user";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Saved delivery address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct Address {
    #[validate(length(max = 50))]
    pub label: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub city: String,
    #[validate(length(min = 1, max = 200))]
    pub street: String,
    #[validate(length(max = 20))]
    pub zip: Option<String>,
    pub location: Option<GeoPoint>,
}

/// User entity as stored in the `users` collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub name: String,
    /// Always lower-case
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub gender: Option<Gender>,
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default = "default_roles")]
    pub roles: Vec<String>,

    pub confirmation_token: Option<String>,
    /// sha256 of the current OTP
    pub otp_hash: Option<String>,
    pub otp_expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub otp_attempts: i32,
    /// sha256 of the emailed reset token
    pub reset_password_token_hash: Option<String>,
    pub reset_password_expires_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub addresses: Vec<Address>,
    /// Favourite product variant ids
    #[serde(default)]
    pub favorites: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_roles() -> Vec<String> {
    vec![DEFAULT_ROLE.to_string()]
}

impl User {
    /// New unverified shopper; the password must already be hashed.
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name,
            email,
            password_hash,
            phone: None,
            gender: None,
            birth_date: None,
            is_verified: false,
            roles: default_roles(),
            confirmation_token: None,
            otp_hash: None,
            otp_expires_at: None,
            otp_attempts: 0,
            reset_password_token_hash: None,
            reset_password_expires_at: None,
            addresses: Vec::new(),
            favorites: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(&mut self, update: UpdateUser) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(phone) = update.phone {
            self.phone = Some(phone);
        }
        if let Some(gender) = update.gender {
            self.gender = Some(gender);
        }
        if let Some(birth_date) = update.birth_date {
            self.birth_date = Some(birth_date);
        }
        if let Some(addresses) = update.addresses {
            self.addresses = addresses;
        }
        if let Some(favorites) = update.favorites {
            self.favorites = favorites;
        }
        self.updated_at = Utc::now();
    }

    /// Mark the email as confirmed and drop every pending verification secret.
    pub fn mark_verified(&mut self) {
        self.is_verified = true;
        self.confirmation_token = None;
        self.otp_hash = None;
        self.otp_expires_at = None;
        self.otp_attempts = 0;
        self.updated_at = Utc::now();
    }

    pub fn otp_matches(&self, otp_hash: &str, now: DateTime<Utc>) -> bool {
        match (&self.otp_hash, self.otp_expires_at) {
            (Some(stored), Some(expires_at)) => stored == otp_hash && expires_at > now,
            _ => false,
        }
    }
}

/// User as returned by the API; never carries secrets
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub gender: Option<Gender>,
    pub birth_date: Option<NaiveDate>,
    pub is_verified: bool,
    pub roles: Vec<String>,
    pub addresses: Vec<Address>,
    pub favorites: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            gender: user.gender,
            birth_date: user.birth_date,
            is_verified: user.is_verified,
            roles: user.roles,
            addresses: user.addresses,
            favorites: user.favorites,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Profile changes. Email and password have their own flows.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(min = 5, max = 30))]
    pub phone: Option<String>,
    pub gender: Option<Gender>,
    pub birth_date: Option<NaiveDate>,
    #[validate(nested)]
    pub addresses: Option<Vec<Address>>,
    pub favorites: Option<Vec<Uuid>>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
pub struct UserFilter {
    /// Case-insensitive substring of the email
    pub email: Option<String>,
    pub is_verified: Option<bool>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: u64,
}

fn default_limit() -> i64 {
    50
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserListResponse {
    pub data: Vec<UserResponse>,
    pub total: u64,
    pub limit: i64,
    pub offset: u64,
}

/// Server-side record of one refresh token, keyed by the token's `jti`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub user_id: Uuid,
    /// sha256 of the refresh token
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
    /// Session that superseded this one on rotation
    pub replaced_by: Option<Uuid>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.revoked_at.is_none() && self.expires_at > now
    }
}

// Auth request/response bodies

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email, length(max = 255))]
    pub email: String,
    #[validate(length(min = 6, max = 128))]
    pub password: String,
    #[validate(length(min = 5, max = 30))]
    pub phone: Option<String>,
    pub gender: Option<Gender>,
    pub birth_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: Uuid,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct VerifyOtpRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(equal = 6))]
    pub otp: String,
}

/// Body carrying only an email (resend-otp, forgot-password)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct EmailRequest {
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RefreshRequest {
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 6, max = 128))]
    pub password: String,
}

/// Access/refresh pair handed out by login and refresh
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Always `Bearer`
    pub token_type: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
    pub user: UserResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LogoutAllResponse {
    pub message: String,
    pub revoked_sessions: u64,
}
