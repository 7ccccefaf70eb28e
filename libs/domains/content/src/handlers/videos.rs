use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::get,
};
use axum_helpers::{
    MessageResponse, UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, NotFoundResponse,
        UnauthorizedResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use super::{ApiResult, ContentState};
use crate::models::{CreateVideo, UpdateVideo, Video, VideoFilter};

#[derive(OpenApi)]
#[openapi(
    paths(list_videos, get_video, create_video, update_video, delete_video),
    components(
        schemas(Video, CreateVideo, UpdateVideo, MessageResponse),
        responses(BadRequestUuidResponse, BadRequestValidationResponse, NotFoundResponse, UnauthorizedResponse)
    ),
    tags(
        (name = "Videos", description = "Product videos")
    ),
    security(("bearer_auth" = []))
)]
pub struct ApiDoc;

pub fn router(state: Arc<ContentState>) -> Router {
    Router::new()
        .route("/", get(list_videos).post(create_video))
        .route(
            "/{id}",
            get(get_video).patch(update_video).delete(delete_video),
        )
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "",
    tag = "Videos",
    params(VideoFilter),
    responses(
        (status = 200, description = "Matching videos", body = Vec<Video>),
        (status = 401, response = UnauthorizedResponse)
    )
)]
async fn list_videos(
    State(state): State<Arc<ContentState>>,
    Query(filter): Query<VideoFilter>,
) -> ApiResult<Json<Vec<Video>>> {
    Ok(Json(state.service.list_videos(filter).await?))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Videos",
    params(("id" = Uuid, Path, description = "Video ID")),
    responses(
        (status = 200, description = "Video found", body = Video),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn get_video(
    State(state): State<Arc<ContentState>>,
    UuidPath(id): UuidPath,
) -> ApiResult<Json<Video>> {
    Ok(Json(state.service.get_video(id).await?))
}

#[utoipa::path(
    post,
    path = "",
    tag = "Videos",
    request_body = CreateVideo,
    responses(
        (status = 201, description = "Video created", body = Video),
        (status = 400, response = BadRequestValidationResponse)
    )
)]
async fn create_video(
    State(state): State<Arc<ContentState>>,
    ValidatedJson(input): ValidatedJson<CreateVideo>,
) -> ApiResult<(StatusCode, Json<Video>)> {
    let video = state.service.create_video(input).await?;
    Ok((StatusCode::CREATED, Json(video)))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Videos",
    params(("id" = Uuid, Path, description = "Video ID")),
    request_body = UpdateVideo,
    responses(
        (status = 200, description = "Video updated", body = Video),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn update_video(
    State(state): State<Arc<ContentState>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateVideo>,
) -> ApiResult<Json<Video>> {
    Ok(Json(state.service.update_video(id, input).await?))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Videos",
    params(("id" = Uuid, Path, description = "Video ID")),
    responses(
        (status = 200, description = "Video deleted", body = MessageResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn delete_video(
    State(state): State<Arc<ContentState>>,
    UuidPath(id): UuidPath,
) -> ApiResult<Json<MessageResponse>> {
    state.service.delete_video(id).await?;
    Ok(Json(MessageResponse::new("Video deleted successfully")))
}
