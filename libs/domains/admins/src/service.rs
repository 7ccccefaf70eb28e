use axum_helpers::{JwtAuth, TokenSubject};
use domain_users::secrets::{hash_password, verify_password};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AdminError, AdminResult};
use crate::models::{
    Admin, AdminFilter, AdminLoginRequest, AdminResponse, AdminTokenResponse, CreateAdmin,
    UpdateAdmin,
};
use crate::repository::AdminRepository;

fn validate<T: Validate>(input: &T) -> AdminResult<()> {
    input
        .validate()
        .map_err(|e| AdminError::Validation(e.to_string()))
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Back-office accounts and their login
#[derive(Clone)]
pub struct AdminService {
    admins: Arc<dyn AdminRepository>,
    jwt: JwtAuth,
}

impl AdminService {
    pub fn new(admins: Arc<dyn AdminRepository>, jwt: JwtAuth) -> Self {
        Self { admins, jwt }
    }

    pub fn jwt(&self) -> &JwtAuth {
        &self.jwt
    }

    async fn find(&self, id: Uuid) -> AdminResult<Admin> {
        self.admins
            .get_by_id(id)
            .await?
            .ok_or(AdminError::NotFound(id))
    }

    #[instrument(skip(self, input), fields(role = %input.role))]
    pub async fn create_admin(&self, input: CreateAdmin) -> AdminResult<AdminResponse> {
        validate(&input)?;
        let password_hash = hash_password(&input.password)?;
        let admin = Admin::new(
            input.name,
            normalize_email(&input.email),
            password_hash,
            input.role,
        );
        Ok(self.admins.create(admin).await?.into())
    }

    pub async fn get_admin(&self, id: Uuid) -> AdminResult<AdminResponse> {
        Ok(self.find(id).await?.into())
    }

    pub async fn list_admins(&self, filter: AdminFilter) -> AdminResult<Vec<AdminResponse>> {
        let admins = self.admins.list(filter).await?;
        Ok(admins.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self, input))]
    pub async fn update_admin(&self, id: Uuid, input: UpdateAdmin) -> AdminResult<AdminResponse> {
        validate(&input)?;
        let mut admin = self.find(id).await?;

        if let Some(name) = input.name {
            admin.name = name;
        }
        if let Some(role) = input.role {
            admin.role = role;
        }
        if let Some(is_active) = input.is_active {
            admin.is_active = is_active;
        }
        if let Some(password) = input.password {
            admin.password_hash = hash_password(&password)?;
        }
        admin.updated_at = chrono::Utc::now();

        Ok(self.admins.update(admin).await?.into())
    }

    #[instrument(skip(self))]
    pub async fn delete_admin(&self, id: Uuid) -> AdminResult<()> {
        if !self.admins.delete(id).await? {
            return Err(AdminError::NotFound(id));
        }
        tracing::info!(admin_id = %id, "Admin removed");
        Ok(())
    }

    /// Check credentials and issue an access token carrying `admin` and the role
    #[instrument(skip_all)]
    pub async fn login(&self, input: AdminLoginRequest) -> AdminResult<AdminTokenResponse> {
        validate(&input)?;
        let admin = self
            .admins
            .get_by_email(&normalize_email(&input.email))
            .await?
            .ok_or(AdminError::InvalidCredentials)?;

        if !verify_password(&input.password, &admin.password_hash)? {
            return Err(AdminError::InvalidCredentials);
        }
        if !admin.is_active {
            return Err(AdminError::Inactive);
        }

        let roles = admin.token_roles();
        let issued = self.jwt.create_access_token(&TokenSubject {
            id: admin.id,
            email: &admin.email,
            name: &admin.name,
            roles: &roles,
        })?;

        tracing::info!(admin_id = %admin.id, "Admin logged in");
        Ok(AdminTokenResponse {
            access_token: issued.token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt.access_ttl_secs(),
            admin: admin.into(),
        })
    }
}
