use async_trait::async_trait;
use uuid::Uuid;

use crate::error::CommerceResult;
use crate::models::{Cart, CartFilter, Order, OrderFilter, ReturnFilter, ReturnRequest};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// Insert; a second cart for the same user is [`crate::CommerceError::CartExists`]
    async fn create(&self, cart: Cart) -> CommerceResult<Cart>;

    async fn get_by_id(&self, id: Uuid) -> CommerceResult<Option<Cart>>;

    async fn list(&self, filter: CartFilter) -> CommerceResult<Vec<Cart>>;

    async fn update(&self, cart: Cart) -> CommerceResult<Cart>;

    async fn delete(&self, id: Uuid) -> CommerceResult<bool>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn create(&self, order: Order) -> CommerceResult<Order>;

    async fn get_by_id(&self, id: Uuid) -> CommerceResult<Option<Order>>;

    async fn list(&self, filter: OrderFilter) -> CommerceResult<Vec<Order>>;

    async fn update(&self, order: Order) -> CommerceResult<Order>;

    async fn delete(&self, id: Uuid) -> CommerceResult<bool>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReturnRepository: Send + Sync {
    async fn create(&self, request: ReturnRequest) -> CommerceResult<ReturnRequest>;

    async fn get_by_id(&self, id: Uuid) -> CommerceResult<Option<ReturnRequest>>;

    async fn list(&self, filter: ReturnFilter) -> CommerceResult<Vec<ReturnRequest>>;

    async fn update(&self, request: ReturnRequest) -> CommerceResult<ReturnRequest>;

    async fn delete(&self, id: Uuid) -> CommerceResult<bool>;
}
