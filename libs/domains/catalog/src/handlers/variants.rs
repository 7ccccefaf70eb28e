use axum::{
    Json, Router,
    extract::{Multipart, Query, State},
    http::StatusCode,
    routing::get,
};
use axum_helpers::{
    AppError, MessageResponse, MultipartForm, UuidPath,
    errors::responses::{
        BadRequestResponse, BadRequestUuidResponse, NotFoundResponse, PayloadTooLargeResponse,
        UnauthorizedResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use super::{ApiResult, CatalogState};
use crate::models::{CreateVariant, ProductVariant, UpdateVariant, VariantAttributes, VariantFilter};

const IMAGE_FIELD: &str = "images";

#[derive(OpenApi)]
#[openapi(
    paths(list_variants, get_variant, create_variant, update_variant, delete_variant),
    components(
        schemas(ProductVariant, CreateVariant, UpdateVariant, VariantAttributes, MessageResponse),
        responses(
            BadRequestResponse,
            BadRequestUuidResponse,
            NotFoundResponse,
            UnauthorizedResponse,
            PayloadTooLargeResponse
        )
    ),
    tags(
        (name = "Product Variants", description = "Sizes, colors and stock of a product")
    ),
    security(("bearer_auth" = []))
)]
pub struct ApiDoc;

pub fn router(state: Arc<CatalogState>) -> Router {
    Router::new()
        .route("/", get(list_variants).post(create_variant))
        .route(
            "/{id}",
            get(get_variant).patch(update_variant).delete(delete_variant),
        )
        .with_state(state)
}

fn attributes(form: &MultipartForm) -> VariantAttributes {
    VariantAttributes {
        collection: form.string("collection"),
        design_number: form.string("design_number"),
        occasion: form.string("occasion"),
        gender: form.string("gender"),
        pattern: form.string("pattern"),
        closure_type: form.string("closure_type"),
        upper_material: form.string("upper_material"),
        sole_material: form.string("sole_material"),
        lining_material: form.string("lining_material"),
        toe_design: form.string("toe_design"),
    }
}

fn create_input(form: &MultipartForm) -> ApiResult<CreateVariant> {
    let product_id = form
        .uuid("product_id")?
        .ok_or_else(|| AppError::BadRequest("product_id is required".to_string()))?;
    let price = form
        .parse::<f64>("price")?
        .ok_or_else(|| AppError::BadRequest("price is required".to_string()))?;

    Ok(CreateVariant {
        product_id,
        size: form.require("size")?,
        color: form.require("color")?,
        price,
        stock: form.parse("stock")?.unwrap_or(0),
        attributes: attributes(form),
        images: form.files(IMAGE_FIELD),
    })
}

fn update_input(form: &MultipartForm) -> ApiResult<UpdateVariant> {
    let images = form.files(IMAGE_FIELD);
    Ok(UpdateVariant {
        size: form.string("size"),
        color: form.string("color"),
        price: form.parse("price")?,
        stock: form.parse("stock")?,
        attributes: attributes(form),
        images: (!images.is_empty()).then_some(images),
    })
}

/// List variants, optionally of one product
#[utoipa::path(
    get,
    path = "",
    tag = "Product Variants",
    params(VariantFilter),
    responses(
        (status = 200, description = "Matching variants", body = Vec<ProductVariant>),
        (status = 401, response = UnauthorizedResponse)
    )
)]
async fn list_variants(
    State(state): State<Arc<CatalogState>>,
    Query(filter): Query<VariantFilter>,
) -> ApiResult<Json<Vec<ProductVariant>>> {
    Ok(Json(state.service.list_variants(filter).await?))
}

/// Get a variant by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Product Variants",
    params(("id" = Uuid, Path, description = "Variant ID")),
    responses(
        (status = 200, description = "Variant found", body = ProductVariant),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn get_variant(
    State(state): State<Arc<CatalogState>>,
    UuidPath(id): UuidPath,
) -> ApiResult<Json<ProductVariant>> {
    Ok(Json(state.service.get_variant(id).await?))
}

/// Create a variant of an existing product
#[utoipa::path(
    post,
    path = "",
    tag = "Product Variants",
    request_body(content = CreateVariant, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Variant created", body = ProductVariant),
        (status = 400, response = BadRequestResponse),
        (status = 413, response = PayloadTooLargeResponse)
    )
)]
async fn create_variant(
    State(state): State<Arc<CatalogState>>,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<ProductVariant>)> {
    let form = state.uploads.read_form(multipart, &[IMAGE_FIELD]).await?;
    let uploaded = form.files(IMAGE_FIELD);

    let result = match create_input(&form) {
        Ok(input) => state.service.create_variant(input).await.map_err(Into::into),
        Err(e) => Err(e),
    };
    let variant = state.settle(result, &uploaded).await?;

    Ok((StatusCode::CREATED, Json(variant)))
}

/// Partially update a variant
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Product Variants",
    params(("id" = Uuid, Path, description = "Variant ID")),
    request_body(content = UpdateVariant, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Variant updated", body = ProductVariant),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn update_variant(
    State(state): State<Arc<CatalogState>>,
    UuidPath(id): UuidPath,
    multipart: Multipart,
) -> ApiResult<Json<ProductVariant>> {
    let form = state.uploads.read_form(multipart, &[IMAGE_FIELD]).await?;
    let uploaded = form.files(IMAGE_FIELD);

    let result = match update_input(&form) {
        Ok(input) => state.service.update_variant(id, input).await.map_err(Into::into),
        Err(e) => Err(e),
    };
    Ok(Json(state.settle(result, &uploaded).await?))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Product Variants",
    params(("id" = Uuid, Path, description = "Variant ID")),
    responses(
        (status = 200, description = "Variant deleted", body = MessageResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn delete_variant(
    State(state): State<Arc<CatalogState>>,
    UuidPath(id): UuidPath,
) -> ApiResult<Json<MessageResponse>> {
    let variant = state.service.delete_variant(id).await?;
    state.remove_files(&variant.images).await;
    Ok(Json(MessageResponse::new("Variant deleted")))
}
