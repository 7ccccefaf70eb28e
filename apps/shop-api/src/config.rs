use axum_helpers::{JwtConfig, UploadConfig};
use core_config::{AppInfo, Environment, FromEnv, app_info, env_or_default, server::ServerConfig};
use database::mongodb::MongoConfig;
use domain_notifications::EmailConfig;

const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Everything the shop API reads from the environment
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub environment: Environment,
    pub server: ServerConfig,
    pub mongodb: MongoConfig,
    pub jwt: JwtConfig,
    pub uploads: UploadConfig,
    pub email: EmailConfig,
    /// Public origin used in emailed links (`APP_BASE_URL`)
    pub base_url: String,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        Ok(Self {
            app: app_info!(),
            environment: Environment::from_env(),
            server: ServerConfig::from_env()?,
            mongodb: MongoConfig::from_env()?,
            jwt: JwtConfig::from_env()?,
            uploads: UploadConfig::from_env()?,
            email: EmailConfig::from_env()?,
            base_url: env_or_default("APP_BASE_URL", DEFAULT_BASE_URL),
        })
    }
}
