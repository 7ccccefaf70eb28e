use axum::http::{HeaderValue, Method, header};
use std::io;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

const METHODS: [Method; 6] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::PATCH,
    Method::OPTIONS,
];

/// CORS for a fixed list of origins, with credentials.
pub fn create_cors_layer(allowed_origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods(METHODS)
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            header::COOKIE,
        ])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}

/// Build the CORS layer from `CORS_ALLOWED_ORIGIN` (comma separated).
///
/// When the variable is unset every origin is allowed without credentials,
/// which suits local storefront and dashboard development.
pub fn cors_layer_from_env() -> io::Result<CorsLayer> {
    let Ok(raw) = std::env::var("CORS_ALLOWED_ORIGIN") else {
        tracing::warn!("CORS_ALLOWED_ORIGIN not set, allowing any origin");
        return Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(METHODS)
            .allow_headers(Any)
            .max_age(Duration::from_secs(3600)));
    };

    let origins = parse_origins(&raw)?;
    tracing::info!(origins = %raw, "CORS configured");
    Ok(create_cors_layer(origins))
}

fn parse_origins(raw: &str) -> io::Result<Vec<HeaderValue>> {
    let origins = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(HeaderValue::from_str)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid CORS_ALLOWED_ORIGIN value: {e}"),
            )
        })?;

    if origins.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "CORS_ALLOWED_ORIGIN cannot be empty",
        ));
    }
    Ok(origins)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins_splits_and_trims() {
        let origins = parse_origins("http://localhost:3000, https://shop.example.com").unwrap();
        assert_eq!(origins.len(), 2);
        assert_eq!(origins[1], "https://shop.example.com");
    }

    #[test]
    fn test_parse_origins_rejects_empty() {
        assert!(parse_origins(" , ").is_err());
    }

    #[test]
    fn test_cors_layer_from_env_without_variable() {
        temp_env::with_var_unset("CORS_ALLOWED_ORIGIN", || {
            assert!(cors_layer_from_env().is_ok());
        });
    }

    #[test]
    fn test_cors_layer_from_env_invalid_value() {
        temp_env::with_var("CORS_ALLOWED_ORIGIN", Some("bad\norigin"), || {
            assert!(cors_layer_from_env().is_err());
        });
    }
}
