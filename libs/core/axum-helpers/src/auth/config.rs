use core_config::{ConfigError, FromEnv, env_parse_or, env_required};

pub const DEFAULT_ACCESS_TTL_SECS: i64 = 900;
pub const DEFAULT_REFRESH_TTL_SECS: i64 = 604_800;

const MIN_SECRET_LEN: usize = 32;

/// JWT signing configuration.
///
/// Environment variables:
/// - `JWT_SECRET` (required, at least 32 characters)
/// - `JWT_ACCESS_TTL_SECS` (default 900)
/// - `JWT_REFRESH_TTL_SECS` (default 604800)
#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    pub access_ttl_secs: i64,
    pub refresh_ttl_secs: i64,
}

impl JwtConfig {
    /// Default lifetimes. Used in tests and tools; the server loads [`FromEnv`].
    pub fn new(secret: impl Into<String>) -> Result<Self, ConfigError> {
        let secret = secret.into();
        check_secret(&secret)?;
        Ok(Self {
            secret,
            access_ttl_secs: DEFAULT_ACCESS_TTL_SECS,
            refresh_ttl_secs: DEFAULT_REFRESH_TTL_SECS,
        })
    }

    pub fn with_ttls(mut self, access_ttl_secs: i64, refresh_ttl_secs: i64) -> Self {
        self.access_ttl_secs = access_ttl_secs;
        self.refresh_ttl_secs = refresh_ttl_secs;
        self
    }
}

fn check_secret(secret: &str) -> Result<(), ConfigError> {
    if secret.len() < MIN_SECRET_LEN {
        return Err(ConfigError::ParseError {
            key: "JWT_SECRET".to_string(),
            details: format!(
                "must be at least {MIN_SECRET_LEN} characters (got {}). Generate one with: openssl rand -base64 32",
                secret.len()
            ),
        });
    }
    Ok(())
}

impl FromEnv for JwtConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let secret = env_required("JWT_SECRET")?;
        check_secret(&secret)?;

        Ok(Self {
            secret,
            access_ttl_secs: env_parse_or("JWT_ACCESS_TTL_SECS", DEFAULT_ACCESS_TTL_SECS)?,
            refresh_ttl_secs: env_parse_or("JWT_REFRESH_TTL_SECS", DEFAULT_REFRESH_TTL_SECS)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "this-is-a-valid-secret-with-32-chars!";

    #[test]
    fn test_jwt_config_new_valid() {
        let config = JwtConfig::new(SECRET).unwrap();
        assert_eq!(config.secret, SECRET);
        assert_eq!(config.access_ttl_secs, 900);
        assert_eq!(config.refresh_ttl_secs, 604_800);
    }

    #[test]
    fn test_jwt_config_new_too_short() {
        assert!(JwtConfig::new("short").is_err());
    }

    #[test]
    fn test_jwt_config_from_env_with_ttls() {
        temp_env::with_vars(
            [
                ("JWT_SECRET", Some(SECRET)),
                ("JWT_ACCESS_TTL_SECS", Some("60")),
                ("JWT_REFRESH_TTL_SECS", None),
            ],
            || {
                let config = JwtConfig::from_env().unwrap();
                assert_eq!(config.access_ttl_secs, 60);
                assert_eq!(config.refresh_ttl_secs, DEFAULT_REFRESH_TTL_SECS);
            },
        );
    }

    #[test]
    fn test_jwt_config_from_env_missing() {
        temp_env::with_var_unset("JWT_SECRET", || {
            let err = JwtConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("JWT_SECRET"));
        });
    }

    #[test]
    fn test_jwt_config_from_env_too_short() {
        temp_env::with_var("JWT_SECRET", Some("short"), || {
            let err = JwtConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("32 characters"));
        });
    }
}
