use axum::{
    Json, Router,
    extract::{Multipart, Query, State},
    http::StatusCode,
    routing::get,
};
use axum_helpers::{
    MessageResponse, UuidPath,
    errors::responses::{
        BadRequestResponse, BadRequestUuidResponse, NotFoundResponse, UnauthorizedResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use super::{ApiResult, ContentState, IMAGE_FIELD};
use crate::models::{CreateDefaultImage, DefaultImage, DefaultImageFilter, UpdateDefaultImage};

#[derive(OpenApi)]
#[openapi(
    paths(list_default_images, get_default_image, create_default_image, update_default_image, delete_default_image),
    components(
        schemas(DefaultImage, CreateDefaultImage, UpdateDefaultImage, MessageResponse),
        responses(BadRequestResponse, BadRequestUuidResponse, NotFoundResponse, UnauthorizedResponse)
    ),
    tags(
        (name = "Default Images", description = "Fallback images")
    ),
    security(("bearer_auth" = []))
)]
pub struct ApiDoc;

pub fn router(state: Arc<ContentState>) -> Router {
    Router::new()
        .route("/", get(list_default_images).post(create_default_image))
        .route(
            "/{id}",
            get(get_default_image)
                .patch(update_default_image)
                .delete(delete_default_image),
        )
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "",
    tag = "Default Images",
    params(DefaultImageFilter),
    responses(
        (status = 200, description = "Default images", body = Vec<DefaultImage>),
        (status = 401, response = UnauthorizedResponse)
    )
)]
async fn list_default_images(
    State(state): State<Arc<ContentState>>,
    Query(filter): Query<DefaultImageFilter>,
) -> ApiResult<Json<Vec<DefaultImage>>> {
    Ok(Json(state.service.list_default_images(filter).await?))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Default Images",
    params(("id" = Uuid, Path, description = "Default image ID")),
    responses(
        (status = 200, description = "Default image found", body = DefaultImage),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn get_default_image(
    State(state): State<Arc<ContentState>>,
    UuidPath(id): UuidPath,
) -> ApiResult<Json<DefaultImage>> {
    Ok(Json(state.service.get_default_image(id).await?))
}

#[utoipa::path(
    post,
    path = "",
    tag = "Default Images",
    request_body(content = CreateDefaultImage, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Default image created", body = DefaultImage),
        (status = 400, response = BadRequestResponse)
    )
)]
async fn create_default_image(
    State(state): State<Arc<ContentState>>,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<DefaultImage>)> {
    let form = state.uploads.read_form(multipart, &[IMAGE_FIELD]).await?;
    let uploaded = form.file(IMAGE_FIELD);

    let result = match form.require("name") {
        Ok(name) => state
            .service
            .create_default_image(CreateDefaultImage {
                name,
                image: uploaded.clone(),
            })
            .await
            .map_err(Into::into),
        Err(e) => Err(e),
    };
    let image = state.settle(result, uploaded.as_deref()).await?;

    Ok((StatusCode::CREATED, Json(image)))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Default Images",
    params(("id" = Uuid, Path, description = "Default image ID")),
    request_body(content = UpdateDefaultImage, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Default image updated", body = DefaultImage),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn update_default_image(
    State(state): State<Arc<ContentState>>,
    UuidPath(id): UuidPath,
    multipart: Multipart,
) -> ApiResult<Json<DefaultImage>> {
    let form = state.uploads.read_form(multipart, &[IMAGE_FIELD]).await?;
    let uploaded = form.file(IMAGE_FIELD);

    let input = UpdateDefaultImage {
        name: form.string("name"),
        image: uploaded.clone(),
    };
    let result = state
        .service
        .update_default_image(id, input)
        .await
        .map_err(Into::into);
    Ok(Json(state.settle(result, uploaded.as_deref()).await?))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Default Images",
    params(("id" = Uuid, Path, description = "Default image ID")),
    responses(
        (status = 200, description = "Default image deleted", body = MessageResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn delete_default_image(
    State(state): State<Arc<ContentState>>,
    UuidPath(id): UuidPath,
) -> ApiResult<Json<MessageResponse>> {
    let image = state.service.delete_default_image(id).await?;
    if let Some(path) = &image.image {
        state.uploads.remove(path).await;
    }
    Ok(Json(MessageResponse::new("Default image deleted successfully")))
}
