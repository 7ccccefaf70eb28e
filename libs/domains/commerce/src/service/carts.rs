use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use super::validate;
use crate::error::{CommerceError, CommerceResult};
use crate::models::{Cart, CartFilter, CreateCart, UpdateCart};
use crate::repository::CartRepository;

pub struct CartService<R: CartRepository> {
    repository: Arc<R>,
}

impl<R: CartRepository> CartService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create the caller's cart unless `user_id` names someone else
    #[instrument(skip(self, input))]
    pub async fn create_cart(&self, input: CreateCart, caller: Uuid) -> CommerceResult<Cart> {
        validate(&input)?;
        let user_id = input.user_id.unwrap_or(caller);
        self.repository.create(Cart::new(user_id, input.items)).await
    }

    #[instrument(skip(self))]
    pub async fn get_cart(&self, id: Uuid) -> CommerceResult<Cart> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(CommerceError::CartNotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn list_carts(&self, filter: CartFilter) -> CommerceResult<Vec<Cart>> {
        self.repository.list(filter).await
    }

    #[instrument(skip(self, input))]
    pub async fn update_cart(&self, id: Uuid, input: UpdateCart) -> CommerceResult<Cart> {
        validate(&input)?;
        let mut cart = self.get_cart(id).await?;
        cart.apply_update(input);
        self.repository.update(cart).await
    }

    #[instrument(skip(self))]
    pub async fn delete_cart(&self, id: Uuid) -> CommerceResult<()> {
        if !self.repository.delete(id).await? {
            return Err(CommerceError::CartNotFound(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CartItem;
    use crate::repository::MockCartRepository;

    fn item(quantity: i32) -> CartItem {
        CartItem {
            product_id: Uuid::now_v7(),
            size: Some("40".into()),
            color: Some("red".into()),
            quantity,
        }
    }

    #[tokio::test]
    async fn test_create_cart_for_caller() {
        let caller = Uuid::now_v7();
        let mut repo = MockCartRepository::new();
        repo.expect_create()
            .withf(move |c| c.user_id == caller && c.items.len() == 1)
            .returning(Ok);

        let cart = CartService::new(repo)
            .create_cart(
                CreateCart {
                    user_id: None,
                    items: vec![item(2)],
                },
                caller,
            )
            .await
            .unwrap();

        assert_eq!(cart.user_id, caller);
    }

    #[tokio::test]
    async fn test_second_cart_is_conflict() {
        let mut repo = MockCartRepository::new();
        repo.expect_create()
            .returning(|c| Err(CommerceError::CartExists(c.user_id)));

        let result = CartService::new(repo)
            .create_cart(CreateCart::default(), Uuid::now_v7())
            .await;

        assert!(matches!(result, Err(CommerceError::CartExists(_))));
    }

    #[tokio::test]
    async fn test_update_replaces_items() {
        let cart = Cart::new(Uuid::now_v7(), vec![item(1)]);
        let id = cart.id;

        let mut repo = MockCartRepository::new();
        repo.expect_get_by_id()
            .returning(move |_| Ok(Some(cart.clone())));
        repo.expect_update().returning(Ok);

        let updated = CartService::new(repo)
            .update_cart(
                id,
                UpdateCart {
                    items: Some(vec![item(3), item(1)]),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.items.len(), 2);
        assert_eq!(updated.items[0].quantity, 3);
    }

    #[tokio::test]
    async fn test_update_rejects_zero_quantity() {
        let mut repo = MockCartRepository::new();
        repo.expect_get_by_id().never();

        let result = CartService::new(repo)
            .update_cart(
                Uuid::now_v7(),
                UpdateCart {
                    items: Some(vec![item(0)]),
                },
            )
            .await;

        assert!(matches!(result, Err(CommerceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_cart() {
        let mut repo = MockCartRepository::new();
        repo.expect_delete().returning(|_| Ok(false));

        let result = CartService::new(repo).delete_cart(Uuid::now_v7()).await;
        assert!(matches!(result, Err(CommerceError::CartNotFound(_))));
    }
}
