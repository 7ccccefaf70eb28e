use super::jwt::{JwtAuth, JwtClaims};
use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Bearer token from `Authorization`, falling back to the `access_token` cookie.
pub fn extract_token_from_request(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .or_else(|| {
            headers
                .get(header::COOKIE)
                .and_then(|v| v.to_str().ok())
                .and_then(|cookies| {
                    cookies.split(';').find_map(|cookie| {
                        cookie
                            .trim()
                            .strip_prefix("access_token=")
                            .map(str::to_string)
                    })
                })
        })
        .filter(|token| !token.is_empty())
}

/// Rejects requests without a valid access token and stores the claims in
/// the request extensions.
///
/// ```ignore
/// let protected = Router::new()
///     .route("/products", get(list_products))
///     .layer(axum::middleware::from_fn_with_state(jwt_auth, jwt_auth_middleware));
/// ```
pub async fn jwt_auth_middleware(
    State(auth): State<JwtAuth>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let Some(token) = extract_token_from_request(&headers) else {
        tracing::debug!("No JWT found in Authorization header or cookie");
        return Err(AppError::Unauthorized("No token provided".to_string()).into_response());
    };

    let claims = auth.verify_access(&token).map_err(|e| {
        tracing::debug!(error = %e, "JWT verification failed");
        AppError::Unauthorized("Invalid or expired token".to_string()).into_response()
    })?;

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Claims placed by [`jwt_auth_middleware`]; 401 when the route is not behind it.
impl<S> FromRequestParts<S> for JwtClaims
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<JwtClaims>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}
