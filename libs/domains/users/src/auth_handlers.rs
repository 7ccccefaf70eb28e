//! HTTP handlers for `/auth`

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    middleware,
    response::{AppendHeaders, IntoResponse, Response},
    routing::{get, post},
};
use axum_helpers::{
    JwtClaims, MessageResponse, ValidatedJson,
    errors::responses::{
        BadRequestResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse, TooManyRequestsResponse, UnauthorizedResponse,
    },
    jwt_auth_middleware,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::auth::AuthService;
use crate::error::{UserError, UserResult};
use crate::models::{
    EmailRequest, LoginRequest, LogoutAllResponse, RefreshRequest, RegisterRequest,
    RegisterResponse, ResetPasswordRequest, TokenResponse, UserResponse, VerifyOtpRequest,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        register,
        confirm_email,
        verify_otp,
        resend_otp,
        login,
        refresh,
        logout,
        logout_all,
        forgot_password,
        reset_password,
        me,
    ),
    components(
        schemas(
            RegisterRequest, RegisterResponse, VerifyOtpRequest, EmailRequest, LoginRequest,
            RefreshRequest, ResetPasswordRequest, TokenResponse, LogoutAllResponse, MessageResponse
        ),
        responses(
            BadRequestResponse,
            BadRequestValidationResponse,
            UnauthorizedResponse,
            NotFoundResponse,
            TooManyRequestsResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Auth", description = "Registration, verification and token sessions")
    )
)]
pub struct ApiDoc;

struct AuthState {
    service: AuthService,
    /// Add `Secure` to auth cookies (off for plain-http development)
    secure_cookies: bool,
}

type SharedState = State<Arc<AuthState>>;

/// Routes under `/auth`. `/me` and `/logout-all` carry their own JWT layer.
pub fn router(service: AuthService, secure_cookies: bool) -> Router {
    let jwt = service.jwt().clone();
    let state = Arc::new(AuthState {
        service,
        secure_cookies,
    });

    let protected = Router::new()
        .route("/me", get(me))
        .route("/logout-all", post(logout_all))
        .route_layer(middleware::from_fn_with_state(jwt, jwt_auth_middleware));

    Router::new()
        .route("/register", post(register))
        .route("/confirm/{token}", get(confirm_email))
        .route("/verify-otp", post(verify_otp))
        .route("/resend-otp", post(resend_otp))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/logout", post(logout))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password/{token}", post(reset_password))
        .merge(protected)
        .with_state(state)
}

fn user_agent(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

fn cookie(name: &str, value: &str, max_age: i64, secure: bool) -> UserResult<HeaderValue> {
    let secure_flag = if secure { " Secure;" } else { "" };
    let cookie = format!(
        "{}={}; HttpOnly;{} SameSite=Strict; Path=/; Max-Age={}",
        name, value, secure_flag, max_age
    );
    HeaderValue::from_str(&cookie)
        .map_err(|e| UserError::Internal(format!("Failed to create cookie: {}", e)))
}

/// Token pair as JSON, mirrored into http-only cookies for browser clients
fn token_response(state: &AuthState, tokens: TokenResponse) -> UserResult<Response> {
    let jwt = state.service.jwt();
    let access = cookie(
        "access_token",
        &tokens.access_token,
        jwt.access_ttl_secs(),
        state.secure_cookies,
    )?;
    let refresh = cookie(
        "refresh_token",
        &tokens.refresh_token,
        jwt.refresh_ttl_secs(),
        state.secure_cookies,
    )?;

    Ok((
        AppendHeaders([(header::SET_COOKIE, access), (header::SET_COOKIE, refresh)]),
        Json(tokens),
    )
        .into_response())
}

/// Register a new account and email the confirmation link and OTP
#[utoipa::path(
    post,
    path = "/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = RegisterResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn register(
    State(state): SharedState,
    ValidatedJson(input): ValidatedJson<RegisterRequest>,
) -> UserResult<impl IntoResponse> {
    let response = state.service.register(input).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Confirm an email address from the emailed link
#[utoipa::path(
    get,
    path = "/confirm/{token}",
    tag = "Auth",
    params(("token" = String, Path, description = "Confirmation token")),
    responses(
        (status = 200, description = "Email confirmed", body = MessageResponse),
        (status = 400, response = BadRequestResponse)
    )
)]
async fn confirm_email(
    State(state): SharedState,
    Path(token): Path<String>,
) -> UserResult<Json<MessageResponse>> {
    Ok(Json(state.service.confirm_email(&token).await?))
}

/// Verify an email address with the 6-digit OTP
#[utoipa::path(
    post,
    path = "/verify-otp",
    tag = "Auth",
    request_body = VerifyOtpRequest,
    responses(
        (status = 200, description = "Email verified", body = MessageResponse),
        (status = 400, response = BadRequestResponse),
        (status = 429, response = TooManyRequestsResponse)
    )
)]
async fn verify_otp(
    State(state): SharedState,
    ValidatedJson(input): ValidatedJson<VerifyOtpRequest>,
) -> UserResult<Json<MessageResponse>> {
    Ok(Json(state.service.verify_otp(input).await?))
}

/// Issue a fresh OTP
#[utoipa::path(
    post,
    path = "/resend-otp",
    tag = "Auth",
    request_body = EmailRequest,
    responses(
        (status = 200, description = "OTP sent if the account exists", body = MessageResponse),
        (status = 400, response = BadRequestResponse)
    )
)]
async fn resend_otp(
    State(state): SharedState,
    ValidatedJson(input): ValidatedJson<EmailRequest>,
) -> UserResult<Json<MessageResponse>> {
    Ok(Json(state.service.resend_otp(input).await?))
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token pair issued", body = TokenResponse),
        (status = 400, response = BadRequestResponse)
    )
)]
async fn login(
    State(state): SharedState,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> UserResult<Response> {
    let tokens = state.service.login(input, user_agent(&headers)).await?;
    token_response(&state, tokens)
}

/// Rotate a refresh token
#[utoipa::path(
    post,
    path = "/refresh",
    tag = "Auth",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New token pair", body = TokenResponse),
        (status = 401, response = UnauthorizedResponse)
    )
)]
async fn refresh(
    State(state): SharedState,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<RefreshRequest>,
) -> UserResult<Response> {
    let tokens = state
        .service
        .refresh(&input.refresh_token, user_agent(&headers))
        .await?;
    token_response(&state, tokens)
}

/// Revoke one refresh session
#[utoipa::path(
    post,
    path = "/logout",
    tag = "Auth",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Logged out", body = MessageResponse)
    )
)]
async fn logout(
    State(state): SharedState,
    ValidatedJson(input): ValidatedJson<RefreshRequest>,
) -> UserResult<Response> {
    let message = state.service.logout(&input.refresh_token).await?;

    let clear_access = cookie("access_token", "", 0, state.secure_cookies)?;
    let clear_refresh = cookie("refresh_token", "", 0, state.secure_cookies)?;

    Ok((
        AppendHeaders([
            (header::SET_COOKIE, clear_access),
            (header::SET_COOKIE, clear_refresh),
        ]),
        Json(message),
    )
        .into_response())
}

/// Revoke every session of the caller
#[utoipa::path(
    post,
    path = "/logout-all",
    tag = "Auth",
    responses(
        (status = 200, description = "All sessions revoked", body = LogoutAllResponse),
        (status = 401, response = UnauthorizedResponse)
    ),
    security(("bearer_auth" = []))
)]
async fn logout_all(
    State(state): SharedState,
    claims: JwtClaims,
) -> UserResult<Json<LogoutAllResponse>> {
    let user_id = claims.subject_id().ok_or(UserError::InvalidRefreshToken)?;
    Ok(Json(state.service.logout_all(user_id).await?))
}

/// Email a password reset link
#[utoipa::path(
    post,
    path = "/forgot-password",
    tag = "Auth",
    request_body = EmailRequest,
    responses(
        (status = 200, description = "Reset link sent if the account exists", body = MessageResponse)
    )
)]
async fn forgot_password(
    State(state): SharedState,
    ValidatedJson(input): ValidatedJson<EmailRequest>,
) -> UserResult<Json<MessageResponse>> {
    Ok(Json(state.service.forgot_password(input).await?))
}

/// Set a new password with an emailed reset token
#[utoipa::path(
    post,
    path = "/reset-password/{token}",
    tag = "Auth",
    params(("token" = String, Path, description = "Reset token from the email")),
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset", body = MessageResponse),
        (status = 400, response = BadRequestResponse)
    )
)]
async fn reset_password(
    State(state): SharedState,
    Path(token): Path<String>,
    ValidatedJson(input): ValidatedJson<ResetPasswordRequest>,
) -> UserResult<Json<MessageResponse>> {
    Ok(Json(
        state.service.reset_password(&token, &input.password).await?,
    ))
}

/// The authenticated user
#[utoipa::path(
    get,
    path = "/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse)
    ),
    security(("bearer_auth" = []))
)]
async fn me(State(state): SharedState, claims: JwtClaims) -> UserResult<Json<UserResponse>> {
    let user_id = claims.subject_id().ok_or(UserError::InvalidRefreshToken)?;
    Ok(Json(state.service.me(user_id).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;
    use crate::repository::{MockSessionRepository, MockUserRepository};
    use crate::secrets::hash_password;
    use axum::body::Body;
    use axum::http::Request;
    use axum_helpers::{JwtAuth, JwtConfig, TokenSubject};
    use domain_notifications::{LogProvider, Mailer};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    const SECRET: &str = "test-secret-key-that-is-at-least-32-chars";

    fn jwt() -> JwtAuth {
        JwtAuth::new(&JwtConfig::new(SECRET).unwrap())
    }

    fn app(users: MockUserRepository, sessions: MockSessionRepository) -> Router {
        let service = AuthService::new(
            Arc::new(users),
            Arc::new(sessions),
            jwt(),
            Mailer::new(Arc::new(LogProvider)).unwrap(),
            "http://localhost:8080",
        );
        router(service, false)
    }

    fn json_request(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_register_returns_201() {
        let mut users = MockUserRepository::new();
        users.expect_get_by_email().returning(|_| Ok(None));
        users.expect_create().returning(Ok);

        let response = app(users, MockSessionRepository::new())
            .oneshot(json_request(
                "/register",
                serde_json::json!({
                    "name": "Mona",
                    "email": "mona@example.com",
                    "password": "secret1"
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        assert_eq!(
            body["message"],
            "User registered successfully. Please check your email to confirm your registration."
        );
        assert!(body["user_id"].is_string());
    }

    #[tokio::test]
    async fn test_register_short_password_is_400() {
        let response = app(MockUserRepository::new(), MockSessionRepository::new())
            .oneshot(json_request(
                "/register",
                serde_json::json!({
                    "name": "Mona",
                    "email": "mona@example.com",
                    "password": "123"
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_register_taken_email_message() {
        let mut users = MockUserRepository::new();
        users.expect_get_by_email().returning(|_| {
            Ok(Some(User::new(
                "Mona".into(),
                "mona@example.com".into(),
                "hash".into(),
            )))
        });

        let response = app(users, MockSessionRepository::new())
            .oneshot(json_request(
                "/register",
                serde_json::json!({
                    "name": "Mona",
                    "email": "mona@example.com",
                    "password": "secret1"
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["message"], "Email is already registered");
    }

    #[tokio::test]
    async fn test_login_sets_cookies() {
        let mut user = User::new(
            "Mona".into(),
            "mona@example.com".into(),
            hash_password("secret1").unwrap(),
        );
        user.is_verified = true;

        let mut users = MockUserRepository::new();
        users
            .expect_get_by_email()
            .returning(move |_| Ok(Some(user.clone())));
        let mut sessions = MockSessionRepository::new();
        sessions.expect_create().returning(Ok);

        let response = app(users, sessions)
            .oneshot(json_request(
                "/login",
                serde_json::json!({"email": "mona@example.com", "password": "secret1"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let cookies: Vec<_> = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();
        assert!(cookies.iter().any(|c| c.starts_with("access_token=")));
        assert!(cookies.iter().any(|c| c.starts_with("refresh_token=")));

        let body = json_body(response).await;
        assert_eq!(body["token_type"], "Bearer");
        assert!(body["user"].get("password_hash").is_none());
    }

    #[tokio::test]
    async fn test_refresh_with_garbage_is_401() {
        let response = app(MockUserRepository::new(), MockSessionRepository::new())
            .oneshot(json_request(
                "/refresh",
                serde_json::json!({"refresh_token": "garbage"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_logout_always_succeeds() {
        let response = app(MockUserRepository::new(), MockSessionRepository::new())
            .oneshot(json_request(
                "/logout",
                serde_json::json!({"refresh_token": "garbage"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["message"], "Logged out successfully");
    }

    #[tokio::test]
    async fn test_me_requires_token() {
        let response = app(MockUserRepository::new(), MockSessionRepository::new())
            .oneshot(Request::get("/me").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_me_with_bearer_token() {
        let user = User::new("Mona".into(), "mona@example.com".into(), "hash".into());
        let roles = user.roles.clone();
        let token = jwt()
            .create_access_token(&TokenSubject {
                id: user.id,
                email: &user.email,
                name: &user.name,
                roles: &roles,
            })
            .unwrap()
            .token;

        let mut users = MockUserRepository::new();
        users
            .expect_get_by_id()
            .returning(move |_| Ok(Some(user.clone())));

        let response = app(users, MockSessionRepository::new())
            .oneshot(
                Request::get("/me")
                    .header("authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["email"], "mona@example.com");
    }

    #[tokio::test]
    async fn test_reset_password_invalid_token() {
        let mut users = MockUserRepository::new();
        users.expect_get_by_reset_token_hash().returning(|_| Ok(None));

        let response = app(users, MockSessionRepository::new())
            .oneshot(json_request(
                "/reset-password/abc",
                serde_json::json!({"password": "newpass"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await["message"],
            "Invalid or expired reset password token."
        );
    }
}
