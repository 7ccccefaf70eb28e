//! HTTP handlers for carts, orders and returns

pub mod carts;
pub mod orders;
pub mod returns;

use axum::Router;
use axum_helpers::{AppError, JwtClaims};
use utoipa::OpenApi;
use uuid::Uuid;

use crate::repository::{CartRepository, OrderRepository, ReturnRepository};
use crate::service::{CartService, OrderService, ReturnService};

#[derive(OpenApi)]
#[openapi(nest(
    (path = "/carts", api = carts::ApiDoc),
    (path = "/orders", api = orders::ApiDoc),
    (path = "/returns", api = returns::ApiDoc)
))]
pub struct ApiDoc;

/// `/carts`, `/orders` and `/returns`; callers mount them behind the JWT middleware.
pub fn router<C, O, R>(
    carts: CartService<C>,
    orders: OrderService<O>,
    returns: ReturnService<R>,
) -> Router
where
    C: CartRepository + 'static,
    O: OrderRepository + 'static,
    R: ReturnRepository + 'static,
{
    Router::new()
        .nest("/carts", carts::router(carts))
        .nest("/orders", orders::router(orders))
        .nest("/returns", returns::router(returns))
}

/// The authenticated user's id
fn caller(claims: &JwtClaims) -> Result<Uuid, AppError> {
    claims
        .subject_id()
        .ok_or_else(|| AppError::Unauthorized("Invalid token subject".to_string()))
}
