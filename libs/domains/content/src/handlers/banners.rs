use axum::{
    Json, Router,
    extract::{Multipart, Query, State},
    http::StatusCode,
    routing::get,
};
use axum_helpers::{
    MessageResponse, MultipartForm, UuidPath,
    errors::responses::{
        BadRequestResponse, BadRequestUuidResponse, NotFoundResponse, PayloadTooLargeResponse,
        UnauthorizedResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use super::{ApiResult, ContentState, IMAGE_FIELD};
use crate::models::{Banner, BannerFilter, CreateBanner, UpdateBanner};

#[derive(OpenApi)]
#[openapi(
    paths(list_banners, get_banner, create_banner, update_banner, delete_banner),
    components(
        schemas(Banner, CreateBanner, UpdateBanner, MessageResponse),
        responses(
            BadRequestResponse,
            BadRequestUuidResponse,
            NotFoundResponse,
            PayloadTooLargeResponse,
            UnauthorizedResponse
        )
    ),
    tags(
        (name = "Banners", description = "Home page and product page banners")
    ),
    security(("bearer_auth" = []))
)]
pub struct ApiDoc;

pub fn router(state: Arc<ContentState>) -> Router {
    Router::new()
        .route("/", get(list_banners).post(create_banner))
        .route(
            "/{id}",
            get(get_banner).patch(update_banner).delete(delete_banner),
        )
        .with_state(state)
}

fn create_input(form: &MultipartForm) -> ApiResult<CreateBanner> {
    Ok(CreateBanner {
        name: form.require("name")?,
        image: form.file(IMAGE_FIELD),
        category_id: form.uuid("category_id")?,
        is_middle_banner: form.flag("is_middle_banner").unwrap_or(false),
        is_product_details_banner: form.flag("is_product_details_banner").unwrap_or(false),
    })
}

fn update_input(form: &MultipartForm) -> ApiResult<UpdateBanner> {
    Ok(UpdateBanner {
        name: form.string("name"),
        image: form.file(IMAGE_FIELD),
        category_id: form.uuid("category_id")?,
        is_middle_banner: form.flag("is_middle_banner"),
        is_product_details_banner: form.flag("is_product_details_banner"),
    })
}

#[utoipa::path(
    get,
    path = "",
    tag = "Banners",
    params(BannerFilter),
    responses(
        (status = 200, description = "Matching banners", body = Vec<Banner>),
        (status = 401, response = UnauthorizedResponse)
    )
)]
async fn list_banners(
    State(state): State<Arc<ContentState>>,
    Query(filter): Query<BannerFilter>,
) -> ApiResult<Json<Vec<Banner>>> {
    Ok(Json(state.service.list_banners(filter).await?))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Banners",
    params(("id" = Uuid, Path, description = "Banner ID")),
    responses(
        (status = 200, description = "Banner found", body = Banner),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn get_banner(
    State(state): State<Arc<ContentState>>,
    UuidPath(id): UuidPath,
) -> ApiResult<Json<Banner>> {
    Ok(Json(state.service.get_banner(id).await?))
}

#[utoipa::path(
    post,
    path = "",
    tag = "Banners",
    request_body(content = CreateBanner, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Banner created", body = Banner),
        (status = 400, response = BadRequestResponse),
        (status = 413, response = PayloadTooLargeResponse)
    )
)]
async fn create_banner(
    State(state): State<Arc<ContentState>>,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<Banner>)> {
    let form = state.uploads.read_form(multipart, &[IMAGE_FIELD]).await?;
    let uploaded = form.file(IMAGE_FIELD);

    let result = match create_input(&form) {
        Ok(input) => state.service.create_banner(input).await.map_err(Into::into),
        Err(e) => Err(e),
    };
    let banner = state.settle(result, uploaded.as_deref()).await?;

    Ok((StatusCode::CREATED, Json(banner)))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Banners",
    params(("id" = Uuid, Path, description = "Banner ID")),
    request_body(content = UpdateBanner, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Banner updated", body = Banner),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn update_banner(
    State(state): State<Arc<ContentState>>,
    UuidPath(id): UuidPath,
    multipart: Multipart,
) -> ApiResult<Json<Banner>> {
    let form = state.uploads.read_form(multipart, &[IMAGE_FIELD]).await?;
    let uploaded = form.file(IMAGE_FIELD);

    let result = match update_input(&form) {
        Ok(input) => state.service.update_banner(id, input).await.map_err(Into::into),
        Err(e) => Err(e),
    };
    Ok(Json(state.settle(result, uploaded.as_deref()).await?))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Banners",
    params(("id" = Uuid, Path, description = "Banner ID")),
    responses(
        (status = 200, description = "Banner deleted", body = MessageResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn delete_banner(
    State(state): State<Arc<ContentState>>,
    UuidPath(id): UuidPath,
) -> ApiResult<Json<MessageResponse>> {
    let banner = state.service.delete_banner(id).await?;
    if let Some(image) = &banner.image {
        state.uploads.remove(image).await;
    }
    Ok(Json(MessageResponse::new("Banner deleted successfully")))
}

#[cfg(test)]
mod tests {
    use crate::handlers::test_support::*;
    use crate::models::{Banner, CreateBanner};
    use crate::service::test_support::Mocks;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_create_banner_with_image_and_flags() {
        let dir = tempfile::tempdir().unwrap();
        let category_id = Uuid::now_v7();
        let mut mocks = Mocks::default();
        mocks.banners.expect_create().returning(Ok);

        let response = app(mocks, dir.path())
            .oneshot(form_request(
                "POST",
                "/banners",
                &[
                    ("name", "Winter"),
                    ("category_id", &category_id.to_string()),
                    ("is_middle_banner", "true"),
                    ("is_product_details_banner", "0"),
                ],
                true,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let json = json_body(response).await;
        assert_eq!(json["is_middle_banner"], true);
        assert_eq!(json["is_product_details_banner"], false);
        assert_eq!(json["category_id"], category_id.to_string());
        assert!(json["image"].as_str().unwrap().starts_with("uploads/image-"));
        assert_eq!(stored_files(dir.path()), 1);
    }

    #[tokio::test]
    async fn test_missing_name_discards_image() {
        let dir = tempfile::tempdir().unwrap();
        let mut mocks = Mocks::default();
        mocks.banners.expect_create().never();

        let response = app(mocks, dir.path())
            .oneshot(form_request("POST", "/banners", &[], true))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(stored_files(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_list_banners_by_flag() {
        let dir = tempfile::tempdir().unwrap();
        let mut mocks = Mocks::default();
        mocks
            .banners
            .expect_list()
            .withf(|f| f.is_middle_banner == Some(true) && f.category_id.is_none())
            .returning(|_| {
                Ok(vec![Banner::new(CreateBanner {
                    name: "Middle".into(),
                    is_middle_banner: true,
                    ..Default::default()
                })])
            });

        let response = app(mocks, dir.path())
            .oneshot(
                Request::get("/banners?is_middle_banner=true")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await[0]["name"], "Middle");
    }

    #[tokio::test]
    async fn test_delete_banner_message() {
        let dir = tempfile::tempdir().unwrap();
        let banner = Banner::new(CreateBanner {
            name: "Old".into(),
            ..Default::default()
        });
        let id = banner.id;

        let mut mocks = Mocks::default();
        mocks
            .banners
            .expect_get_by_id()
            .returning(move |_| Ok(Some(banner.clone())));
        mocks.banners.expect_delete().returning(|_| Ok(true));

        let response = app(mocks, dir.path())
            .oneshot(
                Request::delete(format!("/banners/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await["message"],
            "Banner deleted successfully"
        );
    }
}
