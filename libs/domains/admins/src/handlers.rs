//! HTTP handlers for admin accounts
//!
//! Creating an admin and logging in are public; everything else sits behind
//! the JWT middleware.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    middleware,
    routing::{get, post},
};
use axum_helpers::{
    MessageResponse, UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, ConflictResponse,
        InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
    jwt_auth_middleware,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::AdminResult;
use crate::models::{
    AdminFilter, AdminLoginRequest, AdminResponse, AdminRole, AdminTokenResponse, CreateAdmin,
    UpdateAdmin,
};
use crate::service::AdminService;

#[derive(OpenApi)]
#[openapi(
    paths(create_admin, login, list_admins, get_admin, update_admin, delete_admin),
    components(
        schemas(
            AdminResponse,
            AdminRole,
            AdminTokenResponse,
            AdminLoginRequest,
            CreateAdmin,
            UpdateAdmin,
            MessageResponse
        ),
        responses(
            BadRequestUuidResponse,
            BadRequestValidationResponse,
            ConflictResponse,
            NotFoundResponse,
            UnauthorizedResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Admins", description = "Back-office accounts")
    )
)]
pub struct ApiDoc;

/// Routes under `/admins`. Applies its own JWT middleware to the protected ones.
pub fn router(service: AdminService) -> Router {
    let jwt = service.jwt().clone();
    let state = Arc::new(service);

    let protected = Router::new()
        .route("/", get(list_admins))
        .route(
            "/{id}",
            get(get_admin).patch(update_admin).delete(delete_admin),
        )
        .route_layer(middleware::from_fn_with_state(jwt, jwt_auth_middleware));

    Router::new()
        .route("/", post(create_admin))
        .route("/login", post(login))
        .merge(protected)
        .with_state(state)
}

/// Create an admin account
#[utoipa::path(
    post,
    path = "",
    tag = "Admins",
    request_body = CreateAdmin,
    responses(
        (status = 201, description = "Admin created", body = AdminResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse)
    )
)]
async fn create_admin(
    State(service): State<Arc<AdminService>>,
    ValidatedJson(input): ValidatedJson<CreateAdmin>,
) -> AdminResult<(StatusCode, Json<AdminResponse>)> {
    let admin = service.create_admin(input).await?;
    Ok((StatusCode::CREATED, Json(admin)))
}

#[utoipa::path(
    post,
    path = "/login",
    tag = "Admins",
    request_body = AdminLoginRequest,
    responses(
        (status = 200, description = "Access token issued", body = AdminTokenResponse),
        (status = 401, response = UnauthorizedResponse)
    )
)]
async fn login(
    State(service): State<Arc<AdminService>>,
    ValidatedJson(input): ValidatedJson<AdminLoginRequest>,
) -> AdminResult<Json<AdminTokenResponse>> {
    Ok(Json(service.login(input).await?))
}

#[utoipa::path(
    get,
    path = "",
    tag = "Admins",
    params(AdminFilter),
    responses(
        (status = 200, description = "Admins", body = Vec<AdminResponse>),
        (status = 401, response = UnauthorizedResponse)
    ),
    security(("bearer_auth" = []))
)]
async fn list_admins(
    State(service): State<Arc<AdminService>>,
    Query(filter): Query<AdminFilter>,
) -> AdminResult<Json<Vec<AdminResponse>>> {
    Ok(Json(service.list_admins(filter).await?))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Admins",
    params(("id" = Uuid, Path, description = "Admin ID")),
    responses(
        (status = 200, description = "Admin found", body = AdminResponse),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse)
    ),
    security(("bearer_auth" = []))
)]
async fn get_admin(
    State(service): State<Arc<AdminService>>,
    UuidPath(id): UuidPath,
) -> AdminResult<Json<AdminResponse>> {
    Ok(Json(service.get_admin(id).await?))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Admins",
    params(("id" = Uuid, Path, description = "Admin ID")),
    request_body = UpdateAdmin,
    responses(
        (status = 200, description = "Admin updated", body = AdminResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse)
    ),
    security(("bearer_auth" = []))
)]
async fn update_admin(
    State(service): State<Arc<AdminService>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateAdmin>,
) -> AdminResult<Json<AdminResponse>> {
    Ok(Json(service.update_admin(id, input).await?))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Admins",
    params(("id" = Uuid, Path, description = "Admin ID")),
    responses(
        (status = 200, description = "Admin deleted", body = MessageResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse)
    ),
    security(("bearer_auth" = []))
)]
async fn delete_admin(
    State(service): State<Arc<AdminService>>,
    UuidPath(id): UuidPath,
) -> AdminResult<Json<MessageResponse>> {
    service.delete_admin(id).await?;
    Ok(Json(MessageResponse::new("Admin deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AdminError;
    use crate::models::Admin;
    use crate::repository::MockAdminRepository;
    use axum::{body::Body, http::Request, response::Response};
    use axum_helpers::{JwtAuth, JwtConfig};
    use domain_users::secrets::hash_password;
    use http_body_util::BodyExt;
    use tower::ServiceExt;
    use uuid::Uuid;

    const SECRET: &str = "admin-handler-secret-at-least-32-chars";

    fn app(repo: MockAdminRepository) -> Router {
        let jwt = JwtAuth::new(&JwtConfig::new(SECRET).unwrap());
        router(AdminService::new(Arc::new(repo), jwt))
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn stored_admin() -> Admin {
        Admin::new(
            "Omar".into(),
            "omar@example.com".into(),
            hash_password("secret1").unwrap(),
            AdminRole::Manager,
        )
    }

    #[tokio::test]
    async fn test_create_admin_is_public() {
        let mut repo = MockAdminRepository::new();
        repo.expect_create().returning(Ok);

        let response = app(repo)
            .oneshot(json_request(
                "POST",
                "/",
                serde_json::json!({
                    "name": "Omar",
                    "email": "omar@example.com",
                    "password": "secret1"
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        assert_eq!(body["role"], "manager");
        assert!(body.get("password_hash").is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_conflict() {
        let mut repo = MockAdminRepository::new();
        repo.expect_create()
            .returning(|_| Err(AdminError::EmailTaken));

        let response = app(repo)
            .oneshot(json_request(
                "POST",
                "/",
                serde_json::json!({
                    "name": "Omar",
                    "email": "omar@example.com",
                    "password": "secret1"
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_list_requires_token() {
        let mut repo = MockAdminRepository::new();
        repo.expect_list().never();

        let response = app(repo)
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_login_then_list() {
        let mut repo = MockAdminRepository::new();
        repo.expect_get_by_email()
            .returning(|_| Ok(Some(stored_admin())));
        repo.expect_list().returning(|_| Ok(vec![stored_admin()]));
        let app = app(repo);

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/login",
                serde_json::json!({ "email": "omar@example.com", "password": "secret1" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let token = json_body(response).await["access_token"]
            .as_str()
            .unwrap()
            .to_string();

        let response = app
            .oneshot(
                Request::get("/")
                    .header("authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await[0]["email"], "omar@example.com");
    }

    #[tokio::test]
    async fn test_login_bad_password_unauthorized() {
        let mut repo = MockAdminRepository::new();
        repo.expect_get_by_email()
            .returning(|_| Ok(Some(stored_admin())));

        let response = app(repo)
            .oneshot(json_request(
                "POST",
                "/login",
                serde_json::json!({ "email": "omar@example.com", "password": "nope-nope" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_delete_admin_message() {
        let jwt = JwtAuth::new(&JwtConfig::new(SECRET).unwrap());
        let admin = stored_admin();
        let roles = admin.token_roles();
        let token = jwt
            .create_access_token(&axum_helpers::TokenSubject {
                id: admin.id,
                email: &admin.email,
                name: &admin.name,
                roles: &roles,
            })
            .unwrap()
            .token;

        let mut repo = MockAdminRepository::new();
        repo.expect_delete().returning(|_| Ok(true));

        let response = app(repo)
            .oneshot(
                Request::delete(format!("/{}", Uuid::now_v7()))
                    .header("authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await["message"],
            "Admin deleted successfully"
        );
    }
}
