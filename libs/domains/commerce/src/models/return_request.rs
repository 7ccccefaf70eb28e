use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::default_limit;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReturnStatus {
    #[default]
    Requested,
    Processing,
    Refunded,
}

/// The variant being sent back and how many
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct ReturnItem {
    pub variant_id: Uuid,
    #[validate(range(min = 1))]
    pub amount: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReturnEvent {
    /// Status the return moved into
    pub action: String,
    pub date: DateTime<Utc>,
}

/// A return request against an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReturnRequest {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub user_id: Uuid,
    pub order_id: Uuid,
    pub product: ReturnItem,
    #[serde(default)]
    pub status: ReturnStatus,
    #[serde(default)]
    pub history: Vec<ReturnEvent>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReturnRequest {
    pub fn new(input: CreateReturn, user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            user_id,
            order_id: input.order_id,
            product: input.product,
            status: ReturnStatus::Requested,
            history: vec![ReturnEvent {
                action: ReturnStatus::Requested.to_string(),
                date: now,
            }],
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply changes; a new status is recorded in the history
    pub fn apply_update(&mut self, update: UpdateReturn) {
        let now = Utc::now();
        if let Some(status) = update.status {
            if status != self.status {
                self.status = status;
                self.history.push(ReturnEvent {
                    action: status.to_string(),
                    date: now,
                });
            }
        }
        if let Some(product) = update.product {
            self.product = product;
        }
        self.updated_at = now;
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateReturn {
    /// Defaults to the authenticated caller
    pub user_id: Option<Uuid>,
    pub order_id: Uuid,
    #[validate(nested)]
    pub product: ReturnItem,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateReturn {
    pub status: Option<ReturnStatus>,
    #[validate(nested)]
    pub product: Option<ReturnItem>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
pub struct ReturnFilter {
    pub user_id: Option<Uuid>,
    pub order_id: Option<Uuid>,
    pub status: Option<ReturnStatus>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: u64,
}
