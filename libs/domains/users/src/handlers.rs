//! HTTP handlers for user profiles

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use axum_helpers::{
    MessageResponse, UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse, UnauthorizedResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::UserResult;
use crate::models::{Address, Gender, GeoPoint, UpdateUser, UserFilter, UserListResponse, UserResponse};
use crate::service::UserService;

#[derive(OpenApi)]
#[openapi(
    paths(list_users, get_user, update_user, delete_user),
    components(
        schemas(UserResponse, UserListResponse, UpdateUser, Address, GeoPoint, Gender, MessageResponse),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            UnauthorizedResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Users", description = "User profile management")
    ),
    security(("bearer_auth" = []))
)]
pub struct ApiDoc;

/// Routes under `/users`; callers mount them behind the JWT middleware.
pub fn router(service: UserService) -> Router {
    Router::new()
        .route("/", get(list_users))
        .route("/{id}", get(get_user).patch(update_user).delete(delete_user))
        .with_state(Arc::new(service))
}

/// List users
#[utoipa::path(
    get,
    path = "",
    tag = "Users",
    params(UserFilter),
    responses(
        (status = 200, description = "Page of users", body = UserListResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_users(
    State(service): State<Arc<UserService>>,
    Query(filter): Query<UserFilter>,
) -> UserResult<Json<UserListResponse>> {
    let limit = filter.limit;
    let offset = filter.offset;
    let (users, total) = service.list_users(filter).await?;

    Ok(Json(UserListResponse {
        data: users,
        total,
        limit,
        offset,
    }))
}

/// Get a user by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn get_user(
    State(service): State<Arc<UserService>>,
    UuidPath(id): UuidPath,
) -> UserResult<Json<UserResponse>> {
    Ok(Json(service.get_user(id).await?))
}

/// Update profile fields
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn update_user(
    State(service): State<Arc<UserService>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateUser>,
) -> UserResult<Json<UserResponse>> {
    Ok(Json(service.update_user(id, input).await?))
}

/// Delete a user and revoke their sessions
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn delete_user(
    State(service): State<Arc<UserService>>,
    UuidPath(id): UuidPath,
) -> UserResult<Json<MessageResponse>> {
    service.delete_user(id).await?;
    Ok(Json(MessageResponse::new("User deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;
    use crate::repository::{MockSessionRepository, MockUserRepository};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn app(users: MockUserRepository, sessions: MockSessionRepository) -> Router {
        router(UserService::new(Arc::new(users), Arc::new(sessions)))
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut users = MockUserRepository::new();
        users.expect_get_by_id().returning(|_| Ok(None));

        let response = app(users, MockSessionRepository::new())
            .oneshot(
                Request::get(format!("/{}", uuid::Uuid::now_v7()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["message"], "User not found");
    }

    #[tokio::test]
    async fn test_get_user_bad_uuid() {
        let response = app(MockUserRepository::new(), MockSessionRepository::new())
            .oneshot(Request::get("/not-a-uuid").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_users_hides_password_hash() {
        let mut users = MockUserRepository::new();
        users.expect_count().returning(|_| Ok(1));
        users.expect_list().returning(|_| {
            Ok(vec![User::new(
                "Mona".into(),
                "mona@example.com".into(),
                "argon-secret".into(),
            )])
        });

        let response = app(users, MockSessionRepository::new())
            .oneshot(Request::get("/?limit=10").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["limit"], 10);
        assert!(!body.to_string().contains("argon-secret"));
    }

    #[tokio::test]
    async fn test_update_rejects_invalid_body() {
        let response = app(MockUserRepository::new(), MockSessionRepository::new())
            .oneshot(
                Request::patch(format!("/{}", uuid::Uuid::now_v7()))
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"name": ""}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_user_message() {
        let mut users = MockUserRepository::new();
        users.expect_delete().returning(|_| Ok(true));
        let mut sessions = MockSessionRepository::new();
        sessions.expect_revoke_all_for_user().returning(|_| Ok(0));

        let response = app(users, sessions)
            .oneshot(
                Request::delete(format!("/{}", uuid::Uuid::now_v7()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["message"], "User deleted successfully");
    }
}
