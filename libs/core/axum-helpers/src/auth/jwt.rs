use super::config::JwtConfig;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Which half of a token pair a JWT is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,        // Subject (user or admin ID)
    pub email: String,
    pub name: String,
    pub roles: Vec<String>,
    pub typ: TokenType,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,        // Session id for refresh tokens
}

impl JwtClaims {
    /// Subject parsed as a UUID
    pub fn subject_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// Identity a token is issued for
#[derive(Debug, Clone)]
pub struct TokenSubject<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub name: &'a str,
    pub roles: &'a [String],
}

/// A freshly signed token and the claims inside it
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: JwtClaims,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token signing failed: {0}")]
    Encode(jsonwebtoken::errors::Error),

    #[error("invalid token: {0}")]
    Invalid(jsonwebtoken::errors::Error),

    #[error("expected a {expected:?} token")]
    WrongType { expected: TokenType },
}

/// Stateless HS256 signer and verifier for access and refresh tokens.
///
/// Revocation of refresh tokens lives in the caller's session store.
#[derive(Clone)]
pub struct JwtAuth {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
}

impl JwtAuth {
    pub fn new(config: &JwtConfig) -> Self {
        tracing::info!(
            access_ttl_secs = config.access_ttl_secs,
            refresh_ttl_secs = config.refresh_ttl_secs,
            "JWT auth initialized"
        );
        Self {
            encoding: Arc::new(EncodingKey::from_secret(config.secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(config.secret.as_bytes())),
            access_ttl_secs: config.access_ttl_secs,
            refresh_ttl_secs: config.refresh_ttl_secs,
        }
    }

    pub fn access_ttl_secs(&self) -> i64 {
        self.access_ttl_secs
    }

    pub fn refresh_ttl_secs(&self) -> i64 {
        self.refresh_ttl_secs
    }

    pub fn create_access_token(&self, subject: &TokenSubject<'_>) -> Result<IssuedToken, TokenError> {
        self.create_token(subject, TokenType::Access, self.access_ttl_secs)
    }

    pub fn create_refresh_token(&self, subject: &TokenSubject<'_>) -> Result<IssuedToken, TokenError> {
        self.create_token(subject, TokenType::Refresh, self.refresh_ttl_secs)
    }

    fn create_token(
        &self,
        subject: &TokenSubject<'_>,
        typ: TokenType,
        ttl_seconds: i64,
    ) -> Result<IssuedToken, TokenError> {
        let now = Utc::now();
        let claims = JwtClaims {
            sub: subject.id.to_string(),
            email: subject.email.to_string(),
            name: subject.name.to_string(),
            roles: subject.roles.to_vec(),
            typ,
            exp: (now + Duration::seconds(ttl_seconds)).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::now_v7().to_string(),
        };

        let header = Header {
            alg: Algorithm::HS256,
            ..Default::default()
        };

        let token = encode(&header, &claims, &self.encoding).map_err(TokenError::Encode)?;
        Ok(IssuedToken { token, claims })
    }

    fn verify(&self, token: &str, expected: TokenType) -> Result<JwtClaims, TokenError> {
        let claims = decode::<JwtClaims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map_err(TokenError::Invalid)?
            .claims;

        if claims.typ != expected {
            return Err(TokenError::WrongType { expected });
        }
        Ok(claims)
    }

    pub fn verify_access(&self, token: &str) -> Result<JwtClaims, TokenError> {
        self.verify(token, TokenType::Access)
    }

    pub fn verify_refresh(&self, token: &str) -> Result<JwtClaims, TokenError> {
        self.verify(token, TokenType::Refresh)
    }
}
