use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::default_limit;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct CartItem {
    pub product_id: Uuid,
    #[validate(length(min = 1, max = 20))]
    pub size: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub color: Option<String>,
    #[validate(range(min = 1))]
    pub quantity: i32,
}

/// A user's cart; at most one per user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Cart {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(default)]
    pub items: Vec<CartItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    pub fn new(user_id: Uuid, items: Vec<CartItem>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            user_id,
            items,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(&mut self, update: UpdateCart) {
        if let Some(items) = update.items {
            self.items = items;
        }
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CreateCart {
    /// Defaults to the authenticated caller
    pub user_id: Option<Uuid>,
    #[serde(default)]
    #[validate(nested)]
    pub items: Vec<CartItem>,
}

/// Replaces the item list when present
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCart {
    #[validate(nested)]
    pub items: Option<Vec<CartItem>>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
pub struct CartFilter {
    pub user_id: Option<Uuid>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_quantity_rejected() {
        let input = CreateCart {
            user_id: None,
            items: vec![CartItem {
                product_id: Uuid::now_v7(),
                size: Some("42".into()),
                color: None,
                quantity: 0,
            }],
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_update_without_items_keeps_cart() {
        let item = CartItem {
            product_id: Uuid::now_v7(),
            size: None,
            color: None,
            quantity: 2,
        };
        let mut cart = Cart::new(Uuid::now_v7(), vec![item.clone()]);
        cart.apply_update(UpdateCart::default());
        assert_eq!(cart.items, vec![item]);

        cart.apply_update(UpdateCart { items: Some(vec![]) });
        assert!(cart.items.is_empty());
    }
}
