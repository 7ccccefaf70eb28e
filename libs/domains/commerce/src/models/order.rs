use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::default_limit;

/// Fulfilment stage; only ever moves forward
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
}

impl OrderStatus {
    fn stage(self) -> u8 {
        match self {
            OrderStatus::Pending => 0,
            OrderStatus::Processing => 1,
            OrderStatus::Shipped => 2,
            OrderStatus::Delivered => 3,
        }
    }

    /// Same status or any later one
    pub fn can_move_to(self, next: OrderStatus) -> bool {
        next.stage() >= self.stage()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct ShippingAddress {
    #[validate(length(max = 50))]
    pub label: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub city: String,
    #[validate(length(min = 1, max = 200))]
    pub street: String,
    #[validate(length(max = 20))]
    pub zip: Option<String>,
    pub location: Option<GeoPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Order {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub user_id: Uuid,
    /// Ordered product variant ids
    #[serde(default)]
    pub product_variants: Vec<Uuid>,
    pub total_price: f64,
    #[serde(default)]
    pub discount: f64,
    #[serde(default)]
    pub status: OrderStatus,
    pub payment_method: String,
    pub shipping_address: ShippingAddress,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// New pending order for `user_id`
    pub fn new(input: CreateOrder, user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            user_id,
            product_variants: input.product_variants,
            total_price: input.total_price,
            discount: input.discount,
            status: OrderStatus::Pending,
            payment_method: input.payment_method,
            shipping_address: input.shipping_address,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply field changes; the status check is the caller's job
    pub fn apply_update(&mut self, update: UpdateOrder) {
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(payment_method) = update.payment_method {
            self.payment_method = payment_method;
        }
        if let Some(address) = update.shipping_address {
            self.shipping_address = address;
        }
        if let Some(discount) = update.discount {
            self.discount = discount;
        }
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateOrder {
    /// Defaults to the authenticated caller
    pub user_id: Option<Uuid>,
    #[validate(length(min = 1))]
    pub product_variants: Vec<Uuid>,
    #[validate(range(min = 0.0))]
    pub total_price: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub discount: f64,
    #[validate(length(min = 1, max = 50))]
    pub payment_method: String,
    #[validate(nested)]
    pub shipping_address: ShippingAddress,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateOrder {
    pub status: Option<OrderStatus>,
    #[validate(length(min = 1, max = 50))]
    pub payment_method: Option<String>,
    #[validate(nested)]
    pub shipping_address: Option<ShippingAddress>,
    #[validate(range(min = 0.0))]
    pub discount: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
pub struct OrderFilter {
    pub user_id: Option<Uuid>,
    pub status: Option<OrderStatus>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_moves_forward_only() {
        use OrderStatus::*;
        assert!(Pending.can_move_to(Processing));
        assert!(Pending.can_move_to(Delivered));
        assert!(Shipped.can_move_to(Shipped));
        assert!(!Shipped.can_move_to(Processing));
        assert!(!Delivered.can_move_to(Pending));
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(OrderStatus::Shipped.to_string(), "shipped");
        assert_eq!(
            serde_json::to_value(OrderStatus::Processing).unwrap(),
            "processing"
        );
        assert_eq!("delivered".parse::<OrderStatus>().unwrap(), OrderStatus::Delivered);
    }

    #[test]
    fn test_create_rejects_negative_discount() {
        let input = CreateOrder {
            user_id: None,
            product_variants: vec![Uuid::now_v7()],
            total_price: 100.0,
            discount: -5.0,
            payment_method: "cash".into(),
            shipping_address: ShippingAddress {
                label: None,
                city: "Cairo".into(),
                street: "Tahrir 1".into(),
                zip: None,
                location: None,
            },
        };
        assert!(input.validate().is_err());
    }
}
