use axum::{
    Json, Router,
    extract::{Multipart, Query, State},
    http::StatusCode,
    routing::get,
};
use axum_helpers::{
    AppError, MessageResponse, MultipartForm, UuidPath,
    errors::responses::{
        BadRequestResponse, BadRequestUuidResponse, InternalServerErrorResponse,
        NotFoundResponse, PayloadTooLargeResponse, UnauthorizedResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use super::{ApiResult, CatalogState};
use crate::models::{
    Category, CreateProduct, Mark, Product, ProductDetails, ProductFilter, ProductVariant,
    UpdateProduct,
};

const IMAGE_FIELD: &str = "images";

#[derive(OpenApi)]
#[openapi(
    paths(list_products, get_product, create_product, update_product, delete_product),
    components(
        schemas(
            Product,
            ProductDetails,
            CreateProduct,
            UpdateProduct,
            Category,
            Mark,
            ProductVariant,
            MessageResponse
        ),
        responses(
            BadRequestResponse,
            BadRequestUuidResponse,
            NotFoundResponse,
            UnauthorizedResponse,
            PayloadTooLargeResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Products", description = "Product catalog")
    ),
    security(("bearer_auth" = []))
)]
pub struct ApiDoc;

pub fn router(state: Arc<CatalogState>) -> Router {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{id}",
            get(get_product).patch(update_product).delete(delete_product),
        )
        .with_state(state)
}

fn required_price(form: &MultipartForm) -> ApiResult<f64> {
    form.parse::<f64>("base_price")?
        .ok_or_else(|| AppError::BadRequest("base_price is required".to_string()))
}

pub(crate) fn create_input(form: &MultipartForm) -> ApiResult<CreateProduct> {
    Ok(CreateProduct {
        name: form.require("name")?,
        description: form.string("description"),
        brand: form.string("brand"),
        base_price: required_price(form)?,
        category_id: form.uuid("category_id")?,
        mark_id: form.uuid("mark_id")?,
        is_featured: form.flag("is_featured"),
        is_our_offers_exciting: form.flag("is_our_offers_exciting"),
        delivery_note: form.string("delivery_note"),
        images: form.files(IMAGE_FIELD),
    })
}

pub(crate) fn update_input(form: &MultipartForm) -> ApiResult<UpdateProduct> {
    let images = form.files(IMAGE_FIELD);
    Ok(UpdateProduct {
        name: form.string("name"),
        description: form.string("description"),
        brand: form.string("brand"),
        base_price: form.parse("base_price")?,
        category_id: form.uuid("category_id")?,
        mark_id: form.uuid("mark_id")?,
        is_featured: form.flag("is_featured"),
        is_our_offers_exciting: form.flag("is_our_offers_exciting"),
        delivery_note: form.string("delivery_note"),
        images: (!images.is_empty()).then_some(images),
    })
}

/// List products with category, mark and variants resolved
#[utoipa::path(
    get,
    path = "",
    tag = "Products",
    params(ProductFilter),
    responses(
        (status = 200, description = "Matching products", body = Vec<ProductDetails>),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products(
    State(state): State<Arc<CatalogState>>,
    Query(filter): Query<ProductFilter>,
) -> ApiResult<Json<Vec<ProductDetails>>> {
    Ok(Json(state.service.list_products(filter).await?))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Products",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product found", body = ProductDetails),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn get_product(
    State(state): State<Arc<CatalogState>>,
    UuidPath(id): UuidPath,
) -> ApiResult<Json<ProductDetails>> {
    Ok(Json(state.service.get_product(id).await?))
}

/// Create a product; up to five `images` files
#[utoipa::path(
    post,
    path = "",
    tag = "Products",
    request_body(content = CreateProduct, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, response = BadRequestResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 413, response = PayloadTooLargeResponse)
    )
)]
async fn create_product(
    State(state): State<Arc<CatalogState>>,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let form = state.uploads.read_form(multipart, &[IMAGE_FIELD]).await?;
    let uploaded = form.files(IMAGE_FIELD);

    let result = match create_input(&form) {
        Ok(input) => state.service.create_product(input).await.map_err(Into::into),
        Err(e) => Err(e),
    };
    let product = state.settle(result, &uploaded).await?;

    Ok((StatusCode::CREATED, Json(product)))
}

/// Partially update a product; images are replaced only when new files are sent
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Products",
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body(content = UpdateProduct, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 400, response = BadRequestResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 413, response = PayloadTooLargeResponse)
    )
)]
async fn update_product(
    State(state): State<Arc<CatalogState>>,
    UuidPath(id): UuidPath,
    multipart: Multipart,
) -> ApiResult<Json<Product>> {
    let form = state.uploads.read_form(multipart, &[IMAGE_FIELD]).await?;
    let uploaded = form.files(IMAGE_FIELD);

    let result = match update_input(&form) {
        Ok(input) => state.service.update_product(id, input).await.map_err(Into::into),
        Err(e) => Err(e),
    };
    let product = state.settle(result, &uploaded).await?;

    Ok(Json(product))
}

/// Delete a product with its variants and reviews
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Products",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product deleted", body = MessageResponse),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn delete_product(
    State(state): State<Arc<CatalogState>>,
    UuidPath(id): UuidPath,
) -> ApiResult<Json<MessageResponse>> {
    let product = state.service.delete_product(id).await?;
    state.remove_files(&product.images).await;
    Ok(Json(MessageResponse::new("Product deleted")))
}

#[cfg(test)]
mod tests {
    use crate::handlers::test_support::*;
    use crate::models::{CreateProduct, Product};
    use crate::service::test_support::Mocks;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;
    use uuid::Uuid;

    const PNG: &[u8] = b"\x89PNG\r\n\x1a\n";

    #[tokio::test]
    async fn test_create_product_from_multipart() {
        let dir = tempfile::tempdir().unwrap();
        let mut mocks = Mocks::default();
        mocks
            .products
            .expect_create()
            .withf(|p| p.name == "Runner" && p.images.len() == 2 && p.is_featured)
            .returning(Ok);

        let body = multipart(
            &[("name", "Runner"), ("base_price", "249.5"), ("is_featured", "true")],
            &[
                ("images", "a.png", "image/png", PNG),
                ("images", "b.png", "image/png", PNG),
            ],
        );
        let response = app(mocks, dir.path())
            .oneshot(multipart_request("POST", "/products", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let json = json_body(response).await;
        assert_eq!(json["delivery_note"], "توصيل سريع - يوصل غدًا !");
        assert_eq!(json["images"].as_array().unwrap().len(), 2);
        assert_eq!(stored_files(dir.path()), 2);
    }

    #[tokio::test]
    async fn test_create_with_bad_reference_removes_uploads() {
        let dir = tempfile::tempdir().unwrap();
        let mut mocks = Mocks::default();
        mocks.categories.expect_get_by_id().returning(|_| Ok(None));
        mocks.products.expect_create().never();

        let category_id = Uuid::now_v7().to_string();
        let body = multipart(
            &[
                ("name", "Runner"),
                ("base_price", "100"),
                ("category_id", &category_id),
            ],
            &[("images", "a.png", "image/png", PNG)],
        );
        let response = app(mocks, dir.path())
            .oneshot(multipart_request("POST", "/products", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(stored_files(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_create_requires_price() {
        let dir = tempfile::tempdir().unwrap();
        let body = multipart(&[("name", "Runner")], &[]);
        let response = app(Mocks::default(), dir.path())
            .oneshot(multipart_request("POST", "/products", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["message"], "base_price is required");
    }

    #[tokio::test]
    async fn test_rejects_non_image_upload() {
        let dir = tempfile::tempdir().unwrap();
        let body = multipart(
            &[("name", "Runner"), ("base_price", "10")],
            &[("images", "notes.txt", "text/plain", b"hello")],
        );
        let response = app(Mocks::default(), dir.path())
            .oneshot(multipart_request("POST", "/products", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(stored_files(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_update_without_files_keeps_images() {
        let dir = tempfile::tempdir().unwrap();
        let existing = Product::new(CreateProduct {
            name: "Runner".into(),
            base_price: 100.0,
            images: vec!["uploads/old.png".into()],
            ..Default::default()
        });
        let id = existing.id;

        let mut mocks = Mocks::default();
        mocks
            .products
            .expect_get_by_id()
            .returning(move |_| Ok(Some(existing.clone())));
        mocks.products.expect_update().returning(Ok);

        let body = multipart(&[("base_price", "80")], &[]);
        let response = app(mocks, dir.path())
            .oneshot(multipart_request("PATCH", &format!("/products/{id}"), body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["base_price"], 80.0);
        assert_eq!(json["images"][0], "uploads/old.png");
    }

    #[tokio::test]
    async fn test_get_missing_product() {
        let dir = tempfile::tempdir().unwrap();
        let mut mocks = Mocks::default();
        mocks.products.expect_get_by_id().returning(|_| Ok(None));

        let response = app(mocks, dir.path())
            .oneshot(
                Request::get(format!("/products/{}", Uuid::now_v7()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["message"], "Product not found");
    }

    #[tokio::test]
    async fn test_delete_product_message() {
        let dir = tempfile::tempdir().unwrap();
        let existing = Product::new(CreateProduct {
            name: "Runner".into(),
            base_price: 100.0,
            ..Default::default()
        });
        let id = existing.id;

        let mut mocks = Mocks::default();
        mocks
            .products
            .expect_get_by_id()
            .returning(move |_| Ok(Some(existing.clone())));
        mocks.products.expect_delete().returning(|_| Ok(true));
        mocks.variants.expect_delete_by_product().returning(|_| Ok(0));
        mocks.reviews.expect_delete_by_product().returning(|_| Ok(0));

        let response = app(mocks, dir.path())
            .oneshot(
                Request::delete(format!("/products/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["message"], "Product deleted");
    }
}
