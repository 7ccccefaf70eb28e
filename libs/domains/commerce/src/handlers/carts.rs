use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    JwtClaims, MessageResponse, UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, ConflictResponse,
        InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use super::caller;
use crate::models::{Cart, CartFilter, CartItem, CreateCart, UpdateCart};
use crate::repository::CartRepository;
use crate::service::CartService;

#[derive(OpenApi)]
#[openapi(
    paths(list_carts, get_cart, create_cart, update_cart, delete_cart),
    components(
        schemas(Cart, CartItem, CreateCart, UpdateCart, MessageResponse),
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
        (name = "Carts", description = "One shopping cart per user")
    ),
    security(("bearer_auth" = []))
)]
pub struct ApiDoc;

pub fn router<R: CartRepository + 'static>(service: CartService<R>) -> Router {
    Router::new()
        .route("/", get(list_carts::<R>).post(create_cart::<R>))
        .route(
            "/{id}",
            get(get_cart::<R>)
                .patch(update_cart::<R>)
                .delete(delete_cart::<R>),
        )
        .with_state(Arc::new(service))
}

#[utoipa::path(
    get,
    path = "",
    tag = "Carts",
    params(CartFilter),
    responses(
        (status = 200, description = "Matching carts", body = Vec<Cart>),
        (status = 401, response = UnauthorizedResponse)
    )
)]
async fn list_carts<R: CartRepository>(
    State(service): State<Arc<CartService<R>>>,
    Query(filter): Query<CartFilter>,
) -> Result<Json<Vec<Cart>>, axum_helpers::AppError> {
    Ok(Json(service.list_carts(filter).await?))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Carts",
    params(("id" = Uuid, Path, description = "Cart ID")),
    responses(
        (status = 200, description = "Cart found", body = Cart),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn get_cart<R: CartRepository>(
    State(service): State<Arc<CartService<R>>>,
    UuidPath(id): UuidPath,
) -> Result<Json<Cart>, axum_helpers::AppError> {
    Ok(Json(service.get_cart(id).await?))
}

/// Create a cart; `user_id` defaults to the caller
#[utoipa::path(
    post,
    path = "",
    tag = "Carts",
    request_body = CreateCart,
    responses(
        (status = 201, description = "Cart created", body = Cart),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 409, response = ConflictResponse)
    )
)]
async fn create_cart<R: CartRepository>(
    State(service): State<Arc<CartService<R>>>,
    claims: JwtClaims,
    ValidatedJson(input): ValidatedJson<CreateCart>,
) -> Result<impl IntoResponse, axum_helpers::AppError> {
    let cart = service.create_cart(input, caller(&claims)?).await?;
    Ok((StatusCode::CREATED, Json(cart)))
}

/// Replace the cart's items
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Carts",
    params(("id" = Uuid, Path, description = "Cart ID")),
    request_body = UpdateCart,
    responses(
        (status = 200, description = "Cart updated", body = Cart),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn update_cart<R: CartRepository>(
    State(service): State<Arc<CartService<R>>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateCart>,
) -> Result<Json<Cart>, axum_helpers::AppError> {
    Ok(Json(service.update_cart(id, input).await?))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Carts",
    params(("id" = Uuid, Path, description = "Cart ID")),
    responses(
        (status = 200, description = "Cart deleted", body = MessageResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn delete_cart<R: CartRepository>(
    State(service): State<Arc<CartService<R>>>,
    UuidPath(id): UuidPath,
) -> Result<Json<MessageResponse>, axum_helpers::AppError> {
    service.delete_cart(id).await?;
    Ok(Json(MessageResponse::new("Cart deleted successfully")))
}
