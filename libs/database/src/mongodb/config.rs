#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv, env_parse_or};

const DEFAULT_DATABASE: &str = "shop";

/// MongoDB connection settings
///
/// ```ignore
/// let config = MongoConfig::with_database("mongodb://localhost:27017", "shop");
/// let config = MongoConfig::from_env()?; // `config` feature
/// ```
#[derive(Clone, Debug)]
pub struct MongoConfig {
    /// `mongodb://[username:password@]host[:port][/database][?options]`
    pub url: String,
    pub database: String,
    /// Reported to the server in its logs
    pub app_name: Option<String>,
    pub max_pool_size: u32,
    pub min_pool_size: u32,
    pub connect_timeout_secs: u64,
    pub server_selection_timeout_secs: u64,
}

impl MongoConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_database(url: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            database: database.into(),
            ..Self::default()
        }
    }

    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    pub fn with_pool_size(mut self, max: u32, min: u32) -> Self {
        self.max_pool_size = max;
        self.min_pool_size = min;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn database(&self) -> &str {
        &self.database
    }
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            url: "mongodb://localhost:27017".to_string(),
            database: DEFAULT_DATABASE.to_string(),
            app_name: None,
            max_pool_size: 50,
            min_pool_size: 2,
            connect_timeout_secs: 10,
            server_selection_timeout_secs: 30,
        }
    }
}

/// First variable of `keys` that is set, in order.
#[cfg(feature = "config")]
fn first_env(keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| std::env::var(key).ok())
}

/// Environment variables:
/// - `MONGODB_URL`, `MONGO_URL` or `MONGO_URI` (required)
/// - `MONGODB_DATABASE` or `MONGO_DATABASE` (default `shop`)
/// - `MONGODB_APP_NAME`
/// - `MONGODB_MAX_POOL_SIZE` (50), `MONGODB_MIN_POOL_SIZE` (2)
/// - `MONGODB_CONNECT_TIMEOUT_SECS` (10), `MONGODB_SERVER_SELECTION_TIMEOUT_SECS` (30)
#[cfg(feature = "config")]
impl FromEnv for MongoConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let url = first_env(&["MONGODB_URL", "MONGO_URL", "MONGO_URI"]).ok_or_else(|| {
            ConfigError::MissingEnvVar("MONGODB_URL, MONGO_URL or MONGO_URI".to_string())
        })?;

        let database = first_env(&["MONGODB_DATABASE", "MONGO_DATABASE"])
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string());

        Ok(Self {
            url,
            database,
            app_name: std::env::var("MONGODB_APP_NAME").ok(),
            max_pool_size: env_parse_or("MONGODB_MAX_POOL_SIZE", defaults.max_pool_size)?,
            min_pool_size: env_parse_or("MONGODB_MIN_POOL_SIZE", defaults.min_pool_size)?,
            connect_timeout_secs: env_parse_or(
                "MONGODB_CONNECT_TIMEOUT_SECS",
                defaults.connect_timeout_secs,
            )?,
            server_selection_timeout_secs: env_parse_or(
                "MONGODB_SERVER_SELECTION_TIMEOUT_SECS",
                defaults.server_selection_timeout_secs,
            )?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mongo_config_defaults_to_shop_database() {
        let config = MongoConfig::new("mongodb://db:27017");
        assert_eq!(config.url(), "mongodb://db:27017");
        assert_eq!(config.database(), "shop");
        assert_eq!(config.max_pool_size, 50);
    }

    #[test]
    fn test_mongo_config_builders() {
        let config = MongoConfig::with_database("mongodb://db:27017", "storefront")
            .with_app_name("shop-api")
            .with_pool_size(20, 4);
        assert_eq!(config.database, "storefront");
        assert_eq!(config.app_name.as_deref(), Some("shop-api"));
        assert_eq!((config.max_pool_size, config.min_pool_size), (20, 4));
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_mongo_config_from_env() {
        temp_env::with_vars(
            [
                ("MONGODB_URL", Some("mongodb://localhost:27017")),
                ("MONGODB_DATABASE", Some("testdb")),
                ("MONGODB_MAX_POOL_SIZE", Some("10")),
            ],
            || {
                let config = MongoConfig::from_env().unwrap();
                assert_eq!(config.url, "mongodb://localhost:27017");
                assert_eq!(config.database, "testdb");
                assert_eq!(config.max_pool_size, 10);
            },
        );
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_mongo_config_accepts_mongo_uri_alias() {
        temp_env::with_vars(
            [
                ("MONGODB_URL", None::<&str>),
                ("MONGO_URL", None),
                ("MONGO_URI", Some("mongodb://atlas:27017")),
                ("MONGODB_DATABASE", None),
                ("MONGO_DATABASE", None),
            ],
            || {
                let config = MongoConfig::from_env().unwrap();
                assert_eq!(config.url, "mongodb://atlas:27017");
                assert_eq!(config.database, "shop");
            },
        );
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_mongo_config_from_env_missing_url() {
        temp_env::with_vars(
            [
                ("MONGODB_URL", None::<&str>),
                ("MONGO_URL", None),
                ("MONGO_URI", None),
            ],
            || {
                assert!(MongoConfig::from_env().is_err());
            },
        );
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_mongo_config_rejects_bad_pool_size() {
        temp_env::with_vars(
            [
                ("MONGODB_URL", Some("mongodb://localhost:27017")),
                ("MONGODB_MAX_POOL_SIZE", Some("many")),
            ],
            || {
                assert!(matches!(
                    MongoConfig::from_env(),
                    Err(ConfigError::ParseError { .. })
                ));
            },
        );
    }
}
