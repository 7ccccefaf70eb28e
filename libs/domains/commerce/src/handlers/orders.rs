use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    AppError, JwtClaims, MessageResponse, UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestResponse, BadRequestUuidResponse, BadRequestValidationResponse,
        InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use super::caller;
use crate::models::{
    CreateOrder, GeoPoint, Order, OrderFilter, OrderStatus, ShippingAddress, UpdateOrder,
};
use crate::repository::OrderRepository;
use crate::service::OrderService;

#[derive(OpenApi)]
#[openapi(
    paths(list_orders, get_order, create_order, update_order, delete_order),
    components(
        schemas(
            Order,
            OrderStatus,
            ShippingAddress,
            GeoPoint,
            CreateOrder,
            UpdateOrder,
            MessageResponse
        ),
        responses(
            BadRequestResponse,
            BadRequestUuidResponse,
            BadRequestValidationResponse,
            NotFoundResponse,
            UnauthorizedResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Orders", description = "Order placement and fulfilment status")
    ),
    security(("bearer_auth" = []))
)]
pub struct ApiDoc;

pub fn router<R: OrderRepository + 'static>(service: OrderService<R>) -> Router {
    Router::new()
        .route("/", get(list_orders::<R>).post(create_order::<R>))
        .route(
            "/{id}",
            get(get_order::<R>)
                .patch(update_order::<R>)
                .delete(delete_order::<R>),
        )
        .with_state(Arc::new(service))
}

/// List orders, newest first
#[utoipa::path(
    get,
    path = "",
    tag = "Orders",
    params(OrderFilter),
    responses(
        (status = 200, description = "Matching orders", body = Vec<Order>),
        (status = 401, response = UnauthorizedResponse)
    )
)]
async fn list_orders<R: OrderRepository>(
    State(service): State<Arc<OrderService<R>>>,
    Query(filter): Query<OrderFilter>,
) -> Result<Json<Vec<Order>>, AppError> {
    Ok(Json(service.list_orders(filter).await?))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Orders",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order found", body = Order),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn get_order<R: OrderRepository>(
    State(service): State<Arc<OrderService<R>>>,
    UuidPath(id): UuidPath,
) -> Result<Json<Order>, AppError> {
    Ok(Json(service.get_order(id).await?))
}

#[utoipa::path(
    post,
    path = "",
    tag = "Orders",
    request_body = CreateOrder,
    responses(
        (status = 201, description = "Order placed", body = Order),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse)
    )
)]
async fn create_order<R: OrderRepository>(
    State(service): State<Arc<OrderService<R>>>,
    claims: JwtClaims,
    ValidatedJson(input): ValidatedJson<CreateOrder>,
) -> Result<impl IntoResponse, AppError> {
    let order = service.create_order(input, caller(&claims)?).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Orders",
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = UpdateOrder,
    responses(
        (status = 200, description = "Order updated", body = Order),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn update_order<R: OrderRepository>(
    State(service): State<Arc<OrderService<R>>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateOrder>,
) -> Result<Json<Order>, AppError> {
    Ok(Json(service.update_order(id, input).await?))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Orders",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order deleted", body = MessageResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn delete_order<R: OrderRepository>(
    State(service): State<Arc<OrderService<R>>>,
    UuidPath(id): UuidPath,
) -> Result<Json<MessageResponse>, AppError> {
    service.delete_order(id).await?;
    Ok(Json(MessageResponse::new("Order deleted successfully")))
}
