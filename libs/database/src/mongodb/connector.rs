use mongodb::{Client, options::ClientOptions};
use std::time::Duration;
use tracing::info;

use super::MongoConfig;
use crate::common::{DatabaseError, DatabaseResult, RetryConfig, retry, retry_with_backoff};

/// Connect with default pool settings and verify the server answers.
pub async fn connect(url: &str) -> DatabaseResult<Client> {
    connect_from_config(&MongoConfig::new(url)).await
}

/// Connect using a [`MongoConfig`] and verify the server answers.
pub async fn connect_from_config(config: &MongoConfig) -> DatabaseResult<Client> {
    info!(database = %config.database, "Connecting to MongoDB");

    let mut options = ClientOptions::parse(&config.url).await?;
    options.max_pool_size = Some(config.max_pool_size);
    options.min_pool_size = Some(config.min_pool_size);
    options.connect_timeout = Some(Duration::from_secs(config.connect_timeout_secs));
    options.server_selection_timeout =
        Some(Duration::from_secs(config.server_selection_timeout_secs));
    if let Some(app_name) = &config.app_name {
        options.app_name = Some(app_name.clone());
    }

    let client = Client::with_options(options)?;

    client
        .database(&config.database)
        .run_command(mongodb::bson::doc! { "ping": 1 })
        .await
        .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

    info!(database = %config.database, "Connected to MongoDB");
    Ok(client)
}

/// [`connect`] with exponential backoff, for startup while the database may still be booting.
pub async fn connect_with_retry(
    url: &str,
    retry_config: Option<RetryConfig>,
) -> DatabaseResult<Client> {
    match retry_config {
        Some(config) => retry_with_backoff(|| connect(url), config).await,
        None => retry(|| connect(url)).await,
    }
}

pub async fn connect_from_config_with_retry(
    config: &MongoConfig,
    retry_config: Option<RetryConfig>,
) -> DatabaseResult<Client> {
    match retry_config {
        Some(retry_config) => retry_with_backoff(|| connect_from_config(config), retry_config).await,
        None => retry(|| connect_from_config(config)).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_rejects_malformed_url() {
        let result = connect("not-a-mongo-url").await;
        assert!(matches!(result, Err(DatabaseError::Mongo(_))));
    }

    #[tokio::test]
    #[ignore] // Requires a running MongoDB
    async fn test_connect_from_config() {
        let config = MongoConfig::with_database("mongodb://localhost:27017", "shop_test");
        assert!(connect_from_config(&config).await.is_ok());
    }
}
