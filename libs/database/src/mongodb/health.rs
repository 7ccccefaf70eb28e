use mongodb::Client;
use mongodb::bson::doc;
use std::time::Instant;

/// Outcome of a timed ping
#[derive(Debug, Clone)]
pub struct HealthStatus {
    pub healthy: bool,
    /// Error text when unhealthy
    pub message: Option<String>,
    pub response_time_ms: u64,
}

async fn ping(client: &Client) -> mongodb::error::Result<()> {
    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await
        .map(|_| ())
}

pub async fn check_health(client: &Client) -> bool {
    ping(client).await.is_ok()
}

pub async fn check_health_detailed(client: &Client) -> HealthStatus {
    let start = Instant::now();
    let result = ping(client).await;
    let response_time_ms = start.elapsed().as_millis() as u64;

    HealthStatus {
        healthy: result.is_ok(),
        message: result.err().map(|e| e.to_string()),
        response_time_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires a running MongoDB
    async fn test_check_health_detailed() {
        let client = Client::with_uri_str("mongodb://localhost:27017")
            .await
            .unwrap();
        let status = check_health_detailed(&client).await;
        assert!(status.healthy);
        assert!(status.message.is_none());
    }
}
