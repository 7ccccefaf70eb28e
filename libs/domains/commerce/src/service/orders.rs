use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use super::validate;
use crate::error::{CommerceError, CommerceResult};
use crate::models::{CreateOrder, Order, OrderFilter, UpdateOrder};
use crate::repository::OrderRepository;

pub struct OrderService<R: OrderRepository> {
    repository: Arc<R>,
}

impl<R: OrderRepository> OrderService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Place a pending order; `user_id` defaults to the caller
    #[instrument(skip(self, input), fields(total = input.total_price))]
    pub async fn create_order(&self, input: CreateOrder, caller: Uuid) -> CommerceResult<Order> {
        validate(&input)?;
        let user_id = input.user_id.unwrap_or(caller);
        self.repository.create(Order::new(input, user_id)).await
    }

    #[instrument(skip(self))]
    pub async fn get_order(&self, id: Uuid) -> CommerceResult<Order> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(CommerceError::OrderNotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn list_orders(&self, filter: OrderFilter) -> CommerceResult<Vec<Order>> {
        self.repository.list(filter).await
    }

    /// Update an order. Status may stay or advance along
    /// pending, processing, shipped, delivered; never go back.
    #[instrument(skip(self, input))]
    pub async fn update_order(&self, id: Uuid, input: UpdateOrder) -> CommerceResult<Order> {
        validate(&input)?;
        let mut order = self.get_order(id).await?;

        if let Some(next) = input.status {
            if !order.status.can_move_to(next) {
                return Err(CommerceError::InvalidStatusTransition {
                    from: order.status,
                    to: next,
                });
            }
            if next != order.status {
                tracing::info!(order_id = %id, from = %order.status, to = %next, "Order status changed");
            }
        }

        order.apply_update(input);
        self.repository.update(order).await
    }

    #[instrument(skip(self))]
    pub async fn delete_order(&self, id: Uuid) -> CommerceResult<()> {
        if !self.repository.delete(id).await? {
            return Err(CommerceError::OrderNotFound(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OrderStatus, ShippingAddress};
    use crate::repository::MockOrderRepository;

    fn create() -> CreateOrder {
        CreateOrder {
            user_id: None,
            product_variants: vec![Uuid::now_v7()],
            total_price: 450.0,
            discount: 0.0,
            payment_method: "cash_on_delivery".into(),
            shipping_address: ShippingAddress {
                label: Some("home".into()),
                city: "Alexandria".into(),
                street: "Corniche 12".into(),
                zip: None,
                location: None,
            },
        }
    }

    fn order_with(status: OrderStatus) -> Order {
        let mut order = Order::new(create(), Uuid::now_v7());
        order.status = status;
        order
    }

    fn service_with(order: Order) -> OrderService<MockOrderRepository> {
        let mut repo = MockOrderRepository::new();
        repo.expect_get_by_id()
            .returning(move |_| Ok(Some(order.clone())));
        repo.expect_update().returning(Ok);
        OrderService::new(repo)
    }

    #[tokio::test]
    async fn test_new_order_is_pending() {
        let caller = Uuid::now_v7();
        let mut repo = MockOrderRepository::new();
        repo.expect_create().returning(Ok);

        let order = OrderService::new(repo)
            .create_order(create(), caller)
            .await
            .unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.user_id, caller);
    }

    #[tokio::test]
    async fn test_status_advances() {
        let order = order_with(OrderStatus::Processing);
        let id = order.id;

        let updated = service_with(order)
            .update_order(
                id,
                UpdateOrder {
                    status: Some(OrderStatus::Delivered),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.status, OrderStatus::Delivered);
    }

    #[tokio::test]
    async fn test_status_cannot_go_back() {
        let order = order_with(OrderStatus::Shipped);
        let id = order.id;

        let result = service_with(order)
            .update_order(
                id,
                UpdateOrder {
                    status: Some(OrderStatus::Pending),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(
            result,
            Err(CommerceError::InvalidStatusTransition {
                from: OrderStatus::Shipped,
                to: OrderStatus::Pending
            })
        ));
    }

    #[tokio::test]
    async fn test_same_status_is_allowed() {
        let order = order_with(OrderStatus::Shipped);
        let id = order.id;

        let updated = service_with(order)
            .update_order(
                id,
                UpdateOrder {
                    status: Some(OrderStatus::Shipped),
                    discount: Some(20.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.discount, 20.0);
    }

    #[tokio::test]
    async fn test_get_missing_order() {
        let mut repo = MockOrderRepository::new();
        repo.expect_get_by_id().returning(|_| Ok(None));

        let result = OrderService::new(repo).get_order(Uuid::now_v7()).await;
        assert!(matches!(result, Err(CommerceError::OrderNotFound(_))));
    }
}
