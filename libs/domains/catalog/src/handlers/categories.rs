use axum::{
    Json, Router,
    extract::{Multipart, Query, State},
    http::StatusCode,
    routing::get,
};
use axum_helpers::{
    MessageResponse, MultipartForm, UuidPath,
    errors::responses::{
        BadRequestResponse, BadRequestUuidResponse, ConflictResponse, NotFoundResponse,
        UnauthorizedResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use super::{ApiResult, CatalogState, PageParams};
use crate::models::{Category, CategoryFilter, CreateCategory, Product, UpdateCategory};

const IMAGE_FIELD: &str = "image";

#[derive(OpenApi)]
#[openapi(
    paths(
        list_categories,
        get_category,
        category_products,
        category_children,
        create_category,
        update_category,
        delete_category
    ),
    components(
        schemas(Category, CreateCategory, UpdateCategory, MessageResponse),
        responses(
            BadRequestResponse,
            BadRequestUuidResponse,
            ConflictResponse,
            NotFoundResponse,
            UnauthorizedResponse
        )
    ),
    tags(
        (name = "Categories", description = "Category tree")
    ),
    security(("bearer_auth" = []))
)]
pub struct ApiDoc;

pub fn router(state: Arc<CatalogState>) -> Router {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route(
            "/{id}",
            get(get_category)
                .patch(update_category)
                .delete(delete_category),
        )
        .route("/{id}/products", get(category_products))
        .route("/{id}/children", get(category_children))
        .with_state(state)
}

fn create_input(form: &MultipartForm) -> ApiResult<CreateCategory> {
    Ok(CreateCategory {
        name: form.require("name")?,
        slug: form.string("slug"),
        description: form.string("description"),
        parent_id: form.uuid("parent_id")?,
        is_active: form.flag("is_active"),
        image: form.file(IMAGE_FIELD),
    })
}

fn update_input(form: &MultipartForm) -> ApiResult<UpdateCategory> {
    Ok(UpdateCategory {
        name: form.string("name"),
        slug: form.string("slug"),
        description: form.string("description"),
        parent_id: form.uuid("parent_id")?,
        is_active: form.flag("is_active"),
        image: form.file(IMAGE_FIELD),
    })
}

#[utoipa::path(
    get,
    path = "",
    tag = "Categories",
    params(CategoryFilter),
    responses(
        (status = 200, description = "Matching categories", body = Vec<Category>),
        (status = 401, response = UnauthorizedResponse)
    )
)]
async fn list_categories(
    State(state): State<Arc<CatalogState>>,
    Query(filter): Query<CategoryFilter>,
) -> ApiResult<Json<Vec<Category>>> {
    Ok(Json(state.service.list_categories(filter).await?))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Categories",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category found", body = Category),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn get_category(
    State(state): State<Arc<CatalogState>>,
    UuidPath(id): UuidPath,
) -> ApiResult<Json<Category>> {
    Ok(Json(state.service.get_category(id).await?))
}

/// Products assigned to the category
#[utoipa::path(
    get,
    path = "/{id}/products",
    tag = "Categories",
    params(("id" = Uuid, Path, description = "Category ID"), PageParams),
    responses(
        (status = 200, description = "Products in the category", body = Vec<Product>),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn category_products(
    State(state): State<Arc<CatalogState>>,
    UuidPath(id): UuidPath,
    Query(page): Query<PageParams>,
) -> ApiResult<Json<Vec<Product>>> {
    Ok(Json(
        state
            .service
            .category_products(id, page.limit, page.offset)
            .await?,
    ))
}

/// Direct subcategories
#[utoipa::path(
    get,
    path = "/{id}/children",
    tag = "Categories",
    params(("id" = Uuid, Path, description = "Category ID"), PageParams),
    responses(
        (status = 200, description = "Child categories", body = Vec<Category>),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn category_children(
    State(state): State<Arc<CatalogState>>,
    UuidPath(id): UuidPath,
    Query(page): Query<PageParams>,
) -> ApiResult<Json<Vec<Category>>> {
    Ok(Json(
        state
            .service
            .category_children(id, page.limit, page.offset)
            .await?,
    ))
}

#[utoipa::path(
    post,
    path = "",
    tag = "Categories",
    request_body(content = CreateCategory, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 400, response = BadRequestResponse),
        (status = 409, response = ConflictResponse)
    )
)]
async fn create_category(
    State(state): State<Arc<CatalogState>>,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<Category>)> {
    let form = state.uploads.read_form(multipart, &[IMAGE_FIELD]).await?;
    let uploaded = form.files(IMAGE_FIELD);

    let result = match create_input(&form) {
        Ok(input) => state.service.create_category(input).await.map_err(Into::into),
        Err(e) => Err(e),
    };
    let category = state.settle(result, &uploaded).await?;

    Ok((StatusCode::CREATED, Json(category)))
}

/// Partially update a category; the image is kept unless a new one is sent
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Categories",
    params(("id" = Uuid, Path, description = "Category ID")),
    request_body(content = UpdateCategory, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Category updated", body = Category),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse)
    )
)]
async fn update_category(
    State(state): State<Arc<CatalogState>>,
    UuidPath(id): UuidPath,
    multipart: Multipart,
) -> ApiResult<Json<Category>> {
    let form = state.uploads.read_form(multipart, &[IMAGE_FIELD]).await?;
    let uploaded = form.files(IMAGE_FIELD);

    let result = match update_input(&form) {
        Ok(input) => state.service.update_category(id, input).await.map_err(Into::into),
        Err(e) => Err(e),
    };
    Ok(Json(state.settle(result, &uploaded).await?))
}

/// Delete a category; its products and children are detached
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Categories",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category deleted", body = MessageResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn delete_category(
    State(state): State<Arc<CatalogState>>,
    UuidPath(id): UuidPath,
) -> ApiResult<Json<MessageResponse>> {
    let category = state.service.delete_category(id).await?;
    state.remove_files(&category.image).await;
    Ok(Json(MessageResponse::new("Category deleted successfully")))
}
