//! Registration, email verification, password reset and refresh-token sessions.

use axum_helpers::{JwtAuth, MessageResponse, TokenSubject};
use chrono::{DateTime, Duration, Utc};
use domain_notifications::Mailer;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{
    EmailRequest, LoginRequest, LogoutAllResponse, RegisterRequest, RegisterResponse, Session,
    TokenResponse, User, UserResponse, VerifyOtpRequest,
};
use crate::repository::{SessionRepository, UserRepository};
use crate::secrets::{
    generate_otp, generate_reset_token, hash_password, sha256_hex, verify_password,
};

pub const OTP_TTL_MINUTES: i64 = 10;
pub const MAX_OTP_ATTEMPTS: i32 = 5;
pub const RESET_TOKEN_TTL_MINUTES: i64 = 60;

pub const REGISTERED_MESSAGE: &str =
    "User registered successfully. Please check your email to confirm your registration.";
pub const CONFIRMED_MESSAGE: &str = "Email confirmed successfully. You can now log in.";
pub const OTP_VERIFIED_MESSAGE: &str = "Email verified successfully. You can now log in.";
pub const OTP_SENT_MESSAGE: &str = "If this email exists, a new OTP has been sent.";
pub const LOGGED_OUT_MESSAGE: &str = "Logged out successfully";
pub const RESET_LINK_SENT_MESSAGE: &str =
    "If this email exists, a reset password link has been sent.";
pub const PASSWORD_RESET_MESSAGE: &str = "Password reset successfully.";

/// Account lifecycle and token issuance.
///
/// Access tokens are stateless. Each refresh token is backed by a [`Session`]
/// keyed by its `jti`; refreshing revokes that session and links it to its
/// successor, so a revoked token coming back means it leaked.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn SessionRepository>,
    jwt: JwtAuth,
    mailer: Mailer,
    base_url: String,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionRepository>,
        jwt: JwtAuth,
        mailer: Mailer,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            users,
            sessions,
            jwt,
            mailer,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn jwt(&self) -> &JwtAuth {
        &self.jwt
    }

    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterRequest) -> UserResult<RegisterResponse> {
        let email = normalize_email(&input.email);
        if self.users.get_by_email(&email).await?.is_some() {
            return Err(UserError::EmailTaken);
        }

        let mut user = User::new(input.name, email, hash_password(&input.password)?);
        user.phone = input.phone;
        user.gender = input.gender;
        user.birth_date = input.birth_date;

        let confirmation_token = Uuid::new_v4().to_string();
        user.confirmation_token = Some(confirmation_token.clone());
        let otp = set_new_otp(&mut user, Utc::now());

        let user = self.users.create(user).await?;

        let link = format!("{}/api/auth/confirm/{}", self.base_url, confirmation_token);
        if let Err(e) = self
            .mailer
            .send_confirmation(&user.email, &user.name, &link, &otp, OTP_TTL_MINUTES)
            .await
        {
            tracing::warn!(user_id = %user.id, error = %e, "Failed to send confirmation email");
        }

        tracing::info!(user_id = %user.id, "User registered");
        Ok(RegisterResponse {
            message: REGISTERED_MESSAGE.to_string(),
            user_id: user.id,
        })
    }

    #[instrument(skip_all)]
    pub async fn confirm_email(&self, token: &str) -> UserResult<MessageResponse> {
        let mut user = self
            .users
            .get_by_confirmation_token(token)
            .await?
            .ok_or(UserError::InvalidConfirmationToken)?;

        user.mark_verified();
        let user = self.users.update(user).await?;

        tracing::info!(user_id = %user.id, "Email confirmed");
        Ok(MessageResponse::new(CONFIRMED_MESSAGE))
    }

    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn verify_otp(&self, input: VerifyOtpRequest) -> UserResult<MessageResponse> {
        let email = normalize_email(&input.email);
        let mut user = self
            .users
            .get_by_email(&email)
            .await?
            .ok_or(UserError::InvalidOtp)?;

        if user.is_verified {
            return Err(UserError::AlreadyVerified);
        }
        // Every guess spends an attempt before the code is compared
        if !self
            .users
            .claim_otp_attempt(user.id, MAX_OTP_ATTEMPTS)
            .await?
        {
            return Err(UserError::OtpAttemptsExceeded);
        }

        if !user.otp_matches(&sha256_hex(input.otp.trim()), Utc::now()) {
            tracing::debug!(user_id = %user.id, "Wrong OTP");
            return Err(UserError::InvalidOtp);
        }

        user.mark_verified();
        let user = self.users.update(user).await?;

        tracing::info!(user_id = %user.id, "Email verified by OTP");
        Ok(MessageResponse::new(OTP_VERIFIED_MESSAGE))
    }

    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn resend_otp(&self, input: EmailRequest) -> UserResult<MessageResponse> {
        let email = normalize_email(&input.email);
        let Some(mut user) = self.users.get_by_email(&email).await? else {
            return Ok(MessageResponse::new(OTP_SENT_MESSAGE));
        };

        if user.is_verified {
            return Err(UserError::AlreadyVerified);
        }

        let otp = set_new_otp(&mut user, Utc::now());
        let user = self.users.update(user).await?;

        if let Err(e) = self
            .mailer
            .send_otp(&user.email, &user.name, &otp, OTP_TTL_MINUTES)
            .await
        {
            tracing::warn!(user_id = %user.id, error = %e, "Failed to send OTP email");
        }

        Ok(MessageResponse::new(OTP_SENT_MESSAGE))
    }

    #[instrument(skip(self, input, user_agent), fields(email = %input.email))]
    pub async fn login(
        &self,
        input: LoginRequest,
        user_agent: Option<String>,
    ) -> UserResult<TokenResponse> {
        let email = normalize_email(&input.email);
        let user = self
            .users
            .get_by_email(&email)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        if !verify_password(&input.password, &user.password_hash)? {
            return Err(UserError::InvalidCredentials);
        }
        if !user.is_verified {
            return Err(UserError::EmailNotConfirmed);
        }

        let (tokens, session) = self.issue_tokens(user, user_agent)?;
        self.sessions.create(session).await?;

        tracing::info!(user_id = %tokens.user.id, "User logged in");
        Ok(tokens)
    }

    /// Exchange a refresh token for a new pair, revoking the old session.
    #[instrument(skip_all)]
    pub async fn refresh(
        &self,
        refresh_token: &str,
        user_agent: Option<String>,
    ) -> UserResult<TokenResponse> {
        let claims = self
            .jwt
            .verify_refresh(refresh_token)
            .map_err(|_| UserError::InvalidRefreshToken)?;
        let session_id = Uuid::parse_str(&claims.jti).map_err(|_| UserError::InvalidRefreshToken)?;

        let session = self
            .sessions
            .get_by_id(session_id)
            .await?
            .ok_or(UserError::InvalidRefreshToken)?;

        if session.revoked_at.is_some() {
            return Err(self.reuse_detected(&session).await);
        }
        if session.token_hash != sha256_hex(refresh_token) || session.expires_at <= Utc::now() {
            return Err(UserError::InvalidRefreshToken);
        }

        let user = self
            .users
            .get_by_id(session.user_id)
            .await?
            .ok_or(UserError::InvalidRefreshToken)?;

        let (tokens, next) = self.issue_tokens(user, user_agent)?;

        // Lost race against a concurrent refresh with the same token
        if !self.sessions.revoke(session.id, Some(next.id)).await? {
            return Err(self.reuse_detected(&session).await);
        }
        self.sessions.create(next).await?;

        tracing::info!(user_id = %session.user_id, session_id = %session.id, "Refresh token rotated");
        Ok(tokens)
    }

    async fn reuse_detected(&self, session: &Session) -> UserError {
        tracing::warn!(
            user_id = %session.user_id,
            session_id = %session.id,
            "Revoked refresh token presented, revoking all sessions"
        );
        if let Err(e) = self.sessions.revoke_all_for_user(session.user_id).await {
            tracing::error!(user_id = %session.user_id, error = %e, "Failed to revoke sessions");
        }
        UserError::RefreshTokenReused
    }

    /// Revoke the session behind `refresh_token`. Unknown or invalid tokens are ignored.
    #[instrument(skip_all)]
    pub async fn logout(&self, refresh_token: &str) -> UserResult<MessageResponse> {
        let session_id = self
            .jwt
            .verify_refresh(refresh_token)
            .ok()
            .and_then(|claims| Uuid::parse_str(&claims.jti).ok());

        if let Some(id) = session_id {
            if self.sessions.revoke(id, None).await? {
                tracing::info!(session_id = %id, "Session revoked");
            }
        }

        Ok(MessageResponse::new(LOGGED_OUT_MESSAGE))
    }

    #[instrument(skip(self))]
    pub async fn logout_all(&self, user_id: Uuid) -> UserResult<LogoutAllResponse> {
        let revoked = self.sessions.revoke_all_for_user(user_id).await?;
        Ok(LogoutAllResponse {
            message: LOGGED_OUT_MESSAGE.to_string(),
            revoked_sessions: revoked,
        })
    }

    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn forgot_password(&self, input: EmailRequest) -> UserResult<MessageResponse> {
        let email = normalize_email(&input.email);
        let Some(mut user) = self.users.get_by_email(&email).await? else {
            return Ok(MessageResponse::new(RESET_LINK_SENT_MESSAGE));
        };

        let token = generate_reset_token();
        user.reset_password_token_hash = Some(sha256_hex(&token));
        user.reset_password_expires_at = Some(Utc::now() + Duration::minutes(RESET_TOKEN_TTL_MINUTES));
        user.updated_at = Utc::now();
        let user = self.users.update(user).await?;

        let link = format!("{}/api/auth/reset-password/{}", self.base_url, token);
        if let Err(e) = self
            .mailer
            .send_password_reset(&user.email, &user.name, &link, RESET_TOKEN_TTL_MINUTES)
            .await
        {
            tracing::warn!(user_id = %user.id, error = %e, "Failed to send password reset email");
        }

        Ok(MessageResponse::new(RESET_LINK_SENT_MESSAGE))
    }

    #[instrument(skip_all)]
    pub async fn reset_password(&self, token: &str, password: &str) -> UserResult<MessageResponse> {
        let mut user = self
            .users
            .get_by_reset_token_hash(&sha256_hex(token))
            .await?
            .filter(|user| {
                user.reset_password_expires_at
                    .is_some_and(|expires_at| expires_at > Utc::now())
            })
            .ok_or(UserError::InvalidResetToken)?;

        user.password_hash = hash_password(password)?;
        user.reset_password_token_hash = None;
        user.reset_password_expires_at = None;
        user.updated_at = Utc::now();
        let user = self.users.update(user).await?;

        let revoked = self.sessions.revoke_all_for_user(user.id).await?;
        tracing::info!(user_id = %user.id, revoked, "Password reset");
        Ok(MessageResponse::new(PASSWORD_RESET_MESSAGE))
    }

    pub async fn me(&self, user_id: Uuid) -> UserResult<UserResponse> {
        self.users
            .get_by_id(user_id)
            .await?
            .map(Into::into)
            .ok_or(UserError::NotFound(user_id))
    }

    /// Sign a token pair for `user` and build the session for its refresh half.
    fn issue_tokens(
        &self,
        user: User,
        user_agent: Option<String>,
    ) -> UserResult<(TokenResponse, Session)> {
        let subject = TokenSubject {
            id: user.id,
            email: &user.email,
            name: &user.name,
            roles: &user.roles,
        };
        let access = self.jwt.create_access_token(&subject)?;
        let refresh = self.jwt.create_refresh_token(&subject)?;

        let session_id = Uuid::parse_str(&refresh.claims.jti)
            .map_err(|e| UserError::Internal(format!("refresh jti is not a uuid: {e}")))?;
        let now = Utc::now();
        let session = Session {
            id: session_id,
            user_id: user.id,
            token_hash: sha256_hex(&refresh.token),
            expires_at: DateTime::from_timestamp(refresh.claims.exp, 0)
                .unwrap_or(now + Duration::seconds(self.jwt.refresh_ttl_secs())),
            revoked_at: None,
            replaced_by: None,
            user_agent,
            created_at: now,
        };

        let tokens = TokenResponse {
            access_token: access.token,
            refresh_token: refresh.token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt.access_ttl_secs(),
            user: user.into(),
        };

        Ok((tokens, session))
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Store a fresh OTP hash on `user` and return the plain code for the email.
fn set_new_otp(user: &mut User, now: DateTime<Utc>) -> String {
    let otp = generate_otp();
    user.otp_hash = Some(sha256_hex(&otp));
    user.otp_expires_at = Some(now + Duration::minutes(OTP_TTL_MINUTES));
    user.otp_attempts = 0;
    user.updated_at = now;
    otp
}
