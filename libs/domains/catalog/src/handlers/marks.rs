use axum::{
    Json, Router,
    extract::{Multipart, Query, State},
    http::StatusCode,
    routing::get,
};
use axum_helpers::{
    MessageResponse, MultipartForm, UuidPath,
    errors::responses::{
        BadRequestResponse, BadRequestUuidResponse, NotFoundResponse, UnauthorizedResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use super::{ApiResult, CatalogState};
use crate::models::{CreateMark, Mark, MarkFilter, MarkWithProducts, UpdateMark};

const IMAGE_FIELD: &str = "image";

#[derive(OpenApi)]
#[openapi(
    paths(list_marks, get_mark, create_mark, update_mark, delete_mark),
    components(
        schemas(Mark, MarkWithProducts, CreateMark, UpdateMark, MessageResponse),
        responses(BadRequestResponse, BadRequestUuidResponse, NotFoundResponse, UnauthorizedResponse)
    ),
    tags(
        (name = "Marks", description = "Brands and the products carrying them")
    ),
    security(("bearer_auth" = []))
)]
pub struct ApiDoc;

pub fn router(state: Arc<CatalogState>) -> Router {
    Router::new()
        .route("/", get(list_marks).post(create_mark))
        .route("/{id}", get(get_mark).patch(update_mark).delete(delete_mark))
        .with_state(state)
}

fn create_input(form: &MultipartForm) -> ApiResult<CreateMark> {
    Ok(CreateMark {
        name: form.require("name")?,
        image: form.file(IMAGE_FIELD),
    })
}

fn update_input(form: &MultipartForm) -> UpdateMark {
    UpdateMark {
        name: form.string("name"),
        image: form.file(IMAGE_FIELD),
    }
}

#[utoipa::path(
    get,
    path = "",
    tag = "Marks",
    params(MarkFilter),
    responses(
        (status = 200, description = "Marks with their products", body = Vec<MarkWithProducts>),
        (status = 401, response = UnauthorizedResponse)
    )
)]
async fn list_marks(
    State(state): State<Arc<CatalogState>>,
    Query(filter): Query<MarkFilter>,
) -> ApiResult<Json<Vec<MarkWithProducts>>> {
    Ok(Json(state.service.list_marks(filter).await?))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Marks",
    params(("id" = Uuid, Path, description = "Mark ID")),
    responses(
        (status = 200, description = "Mark found", body = MarkWithProducts),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn get_mark(
    State(state): State<Arc<CatalogState>>,
    UuidPath(id): UuidPath,
) -> ApiResult<Json<MarkWithProducts>> {
    Ok(Json(state.service.get_mark(id).await?))
}

#[utoipa::path(
    post,
    path = "",
    tag = "Marks",
    request_body(content = CreateMark, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Mark created", body = Mark),
        (status = 400, response = BadRequestResponse)
    )
)]
async fn create_mark(
    State(state): State<Arc<CatalogState>>,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<Mark>)> {
    let form = state.uploads.read_form(multipart, &[IMAGE_FIELD]).await?;
    let uploaded = form.files(IMAGE_FIELD);

    let result = match create_input(&form) {
        Ok(input) => state.service.create_mark(input).await.map_err(Into::into),
        Err(e) => Err(e),
    };
    let mark = state.settle(result, &uploaded).await?;

    Ok((StatusCode::CREATED, Json(mark)))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Marks",
    params(("id" = Uuid, Path, description = "Mark ID")),
    request_body(content = UpdateMark, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Mark updated", body = Mark),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn update_mark(
    State(state): State<Arc<CatalogState>>,
    UuidPath(id): UuidPath,
    multipart: Multipart,
) -> ApiResult<Json<Mark>> {
    let form = state.uploads.read_form(multipart, &[IMAGE_FIELD]).await?;
    let uploaded = form.files(IMAGE_FIELD);

    let result = state
        .service
        .update_mark(id, update_input(&form))
        .await
        .map_err(Into::into);
    Ok(Json(state.settle(result, &uploaded).await?))
}

/// Delete a mark; its products keep existing without one
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Marks",
    params(("id" = Uuid, Path, description = "Mark ID")),
    responses(
        (status = 200, description = "Mark deleted", body = MessageResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn delete_mark(
    State(state): State<Arc<CatalogState>>,
    UuidPath(id): UuidPath,
) -> ApiResult<Json<MessageResponse>> {
    let mark = state.service.delete_mark(id).await?;
    state.remove_files(&mark.image).await;
    Ok(Json(MessageResponse::new("Mark deleted successfully")))
}

#[cfg(test)]
mod tests {
    use crate::handlers::test_support::*;
    use crate::models::{CreateMark, Mark};
    use crate::service::test_support::Mocks;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_create_mark_without_image() {
        let dir = tempfile::tempdir().unwrap();
        let mut mocks = Mocks::default();
        mocks.marks.expect_create().returning(Ok);

        let body = multipart(&[("name", "Adidas")], &[]);
        let response = app(mocks, dir.path())
            .oneshot(multipart_request("POST", "/marks", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let json = json_body(response).await;
        assert_eq!(json["name"], "Adidas");
        assert!(json["image"].is_null());
    }

    #[tokio::test]
    async fn test_get_mark_includes_products() {
        let dir = tempfile::tempdir().unwrap();
        let mark = Mark::new(CreateMark {
            name: "Adidas".into(),
            image: None,
        });
        let id = mark.id;

        let mut mocks = Mocks::default();
        mocks
            .marks
            .expect_get_by_id()
            .returning(move |_| Ok(Some(mark.clone())));
        mocks.products.expect_list_by_marks().returning(|_| Ok(vec![]));

        let response = app(mocks, dir.path())
            .oneshot(Request::get(format!("/marks/{id}")).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["name"], "Adidas");
        assert_eq!(json["products"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_delete_missing_mark() {
        let dir = tempfile::tempdir().unwrap();
        let mut mocks = Mocks::default();
        mocks.marks.expect_get_by_id().returning(|_| Ok(None));

        let response = app(mocks, dir.path())
            .oneshot(
                Request::delete(format!("/marks/{}", Uuid::now_v7()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["message"], "Mark not found");
    }
}
