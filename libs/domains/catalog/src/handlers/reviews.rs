use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::get,
};
use axum_helpers::{
    AppError, JwtClaims, MessageResponse, UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestResponse, BadRequestUuidResponse, BadRequestValidationResponse,
        ConflictResponse, NotFoundResponse, UnauthorizedResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use super::{ApiResult, CatalogState};
use crate::models::{CreateReview, Review, ReviewFilter, UpdateReview};

#[derive(OpenApi)]
#[openapi(
    paths(list_reviews, get_review, create_review, update_review, delete_review),
    components(
        schemas(Review, CreateReview, UpdateReview, MessageResponse),
        responses(
            BadRequestResponse,
            BadRequestUuidResponse,
            BadRequestValidationResponse,
            ConflictResponse,
            NotFoundResponse,
            UnauthorizedResponse
        )
    ),
    tags(
        (name = "Reviews", description = "Product ratings; every write recomputes the product's rating")
    ),
    security(("bearer_auth" = []))
)]
pub struct ApiDoc;

pub fn router(state: Arc<CatalogState>) -> Router {
    Router::new()
        .route("/", get(list_reviews).post(create_review))
        .route(
            "/{id}",
            get(get_review).patch(update_review).delete(delete_review),
        )
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "",
    tag = "Reviews",
    params(ReviewFilter),
    responses(
        (status = 200, description = "Matching reviews", body = Vec<Review>),
        (status = 401, response = UnauthorizedResponse)
    )
)]
async fn list_reviews(
    State(state): State<Arc<CatalogState>>,
    Query(filter): Query<ReviewFilter>,
) -> ApiResult<Json<Vec<Review>>> {
    Ok(Json(state.service.list_reviews(filter).await?))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Reviews",
    params(("id" = Uuid, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Review found", body = Review),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn get_review(
    State(state): State<Arc<CatalogState>>,
    UuidPath(id): UuidPath,
) -> ApiResult<Json<Review>> {
    Ok(Json(state.service.get_review(id).await?))
}

/// Review a product; `user_id` defaults to the caller
#[utoipa::path(
    post,
    path = "",
    tag = "Reviews",
    request_body = CreateReview,
    responses(
        (status = 201, description = "Review created", body = Review),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 409, response = ConflictResponse)
    )
)]
async fn create_review(
    State(state): State<Arc<CatalogState>>,
    claims: JwtClaims,
    ValidatedJson(input): ValidatedJson<CreateReview>,
) -> ApiResult<(StatusCode, Json<Review>)> {
    let caller = claims
        .subject_id()
        .ok_or_else(|| AppError::Unauthorized("Invalid token subject".to_string()))?;

    let review = state.service.create_review(input, caller).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Reviews",
    params(("id" = Uuid, Path, description = "Review ID")),
    request_body = UpdateReview,
    responses(
        (status = 200, description = "Review updated", body = Review),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn update_review(
    State(state): State<Arc<CatalogState>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateReview>,
) -> ApiResult<Json<Review>> {
    Ok(Json(state.service.update_review(id, input).await?))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Reviews",
    params(("id" = Uuid, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Review deleted", body = MessageResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn delete_review(
    State(state): State<Arc<CatalogState>>,
    UuidPath(id): UuidPath,
) -> ApiResult<Json<MessageResponse>> {
    state.service.delete_review(id).await?;
    Ok(Json(MessageResponse::new("Review deleted successfully")))
}
