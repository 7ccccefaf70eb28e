use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::default_limit;

/// One purchasable size/color combination of a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductVariant {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub product_id: Uuid,
    pub size: String,
    pub color: String,
    pub price: f64,
    pub stock: i64,
    pub collection: Option<String>,
    pub design_number: Option<String>,
    pub occasion: Option<String>,
    pub gender: Option<String>,
    pub pattern: Option<String>,
    pub closure_type: Option<String>,
    pub upper_material: Option<String>,
    pub sole_material: Option<String>,
    pub lining_material: Option<String>,
    pub toe_design: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Free-text descriptive attributes shared by create and update
#[derive(Debug, Clone, Default, PartialEq, Validate, ToSchema)]
pub struct VariantAttributes {
    #[validate(length(max = 100))]
    pub collection: Option<String>,
    #[validate(length(max = 100))]
    pub design_number: Option<String>,
    #[validate(length(max = 100))]
    pub occasion: Option<String>,
    #[validate(length(max = 50))]
    pub gender: Option<String>,
    #[validate(length(max = 100))]
    pub pattern: Option<String>,
    #[validate(length(max = 100))]
    pub closure_type: Option<String>,
    #[validate(length(max = 100))]
    pub upper_material: Option<String>,
    #[validate(length(max = 100))]
    pub sole_material: Option<String>,
    #[validate(length(max = 100))]
    pub lining_material: Option<String>,
    #[validate(length(max = 100))]
    pub toe_design: Option<String>,
}

#[derive(Debug, Clone, Default, Validate, ToSchema)]
pub struct CreateVariant {
    pub product_id: Uuid,
    #[validate(length(min = 1, max = 20))]
    pub size: String,
    #[validate(length(min = 1, max = 50))]
    pub color: String,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[validate(range(min = 0))]
    pub stock: i64,
    #[validate(nested)]
    pub attributes: VariantAttributes,
    #[schema(value_type = Vec<String>, format = Binary)]
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Default, Validate, ToSchema)]
pub struct UpdateVariant {
    #[validate(length(min = 1, max = 20))]
    pub size: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub color: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    #[validate(range(min = 0))]
    pub stock: Option<i64>,
    /// Only the attributes that are `Some` are changed
    #[validate(nested)]
    pub attributes: VariantAttributes,
    #[schema(value_type = Option<Vec<String>>, format = Binary)]
    pub images: Option<Vec<String>>,
}

impl ProductVariant {
    pub fn new(input: CreateVariant) -> Self {
        let now = Utc::now();
        let attrs = input.attributes;
        Self {
            id: Uuid::now_v7(),
            product_id: input.product_id,
            size: input.size,
            color: input.color,
            price: input.price,
            stock: input.stock,
            collection: attrs.collection,
            design_number: attrs.design_number,
            occasion: attrs.occasion,
            gender: attrs.gender,
            pattern: attrs.pattern,
            closure_type: attrs.closure_type,
            upper_material: attrs.upper_material,
            sole_material: attrs.sole_material,
            lining_material: attrs.lining_material,
            toe_design: attrs.toe_design,
            images: input.images,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(&mut self, update: UpdateVariant) {
        if let Some(size) = update.size {
            self.size = size;
        }
        if let Some(color) = update.color {
            self.color = color;
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(stock) = update.stock {
            self.stock = stock;
        }
        if let Some(images) = update.images {
            self.images = images;
        }

        let attrs = update.attributes;
        for (slot, value) in [
            (&mut self.collection, attrs.collection),
            (&mut self.design_number, attrs.design_number),
            (&mut self.occasion, attrs.occasion),
            (&mut self.gender, attrs.gender),
            (&mut self.pattern, attrs.pattern),
            (&mut self.closure_type, attrs.closure_type),
            (&mut self.upper_material, attrs.upper_material),
            (&mut self.sole_material, attrs.sole_material),
            (&mut self.lining_material, attrs.lining_material),
            (&mut self.toe_design, attrs.toe_design),
        ] {
            if value.is_some() {
                *slot = value;
            }
        }
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
pub struct VariantFilter {
    pub product_id: Option<Uuid>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: u64,
}
