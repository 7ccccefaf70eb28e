use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::default_limit;

/// A promotional banner, optionally tied to a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Banner {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub name: String,
    pub image: Option<String>,
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub is_middle_banner: bool,
    #[serde(default)]
    pub is_product_details_banner: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Banner {
    pub fn new(input: CreateBanner) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: input.name,
            image: input.image,
            category_id: input.category_id,
            is_middle_banner: input.is_middle_banner,
            is_product_details_banner: input.is_product_details_banner,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(&mut self, update: UpdateBanner) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(image) = update.image {
            self.image = Some(image);
        }
        if let Some(category_id) = update.category_id {
            self.category_id = Some(category_id);
        }
        if let Some(flag) = update.is_middle_banner {
            self.is_middle_banner = flag;
        }
        if let Some(flag) = update.is_product_details_banner {
            self.is_product_details_banner = flag;
        }
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Default, Validate, ToSchema)]
pub struct CreateBanner {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[schema(value_type = Option<String>, format = Binary)]
    pub image: Option<String>,
    pub category_id: Option<Uuid>,
    pub is_middle_banner: bool,
    pub is_product_details_banner: bool,
}

#[derive(Debug, Clone, Default, Validate, ToSchema)]
pub struct UpdateBanner {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[schema(value_type = Option<String>, format = Binary)]
    pub image: Option<String>,
    pub category_id: Option<Uuid>,
    pub is_middle_banner: Option<bool>,
    pub is_product_details_banner: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
pub struct BannerFilter {
    pub category_id: Option<Uuid>,
    pub is_middle_banner: Option<bool>,
    pub is_product_details_banner: Option<bool>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: u64,
}
