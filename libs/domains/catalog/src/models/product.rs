use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::{Category, Mark, ProductVariant, default_limit};

pub const DEFAULT_DELIVERY_NOTE: &str = "توصيل سريع - يوصل غدًا !";
/// Rating shown while a product has no reviews
pub const DEFAULT_RATING: f64 = 4.5;

/// Product entity as stored in the `products` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub brand: String,
    pub base_price: f64,
    #[serde(default)]
    pub num_of_orders: i64,
    /// Public upload paths, e.g. `uploads/images-1718000000000-42.jpg`
    #[serde(default)]
    pub images: Vec<String>,
    pub category_id: Option<Uuid>,
    pub mark_id: Option<Uuid>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub is_our_offers_exciting: bool,
    pub delivery_note: String,
    /// Mean review rating, 1..=5
    pub ratings_average: f64,
    #[serde(default)]
    pub ratings_quantity: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(input: CreateProduct) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: input.name,
            description: input.description.unwrap_or_default(),
            brand: input.brand.unwrap_or_default(),
            base_price: input.base_price,
            num_of_orders: 0,
            images: input.images,
            category_id: input.category_id,
            mark_id: input.mark_id,
            is_featured: input.is_featured.unwrap_or(false),
            is_our_offers_exciting: input.is_our_offers_exciting.unwrap_or(false),
            delivery_note: input
                .delivery_note
                .unwrap_or_else(|| DEFAULT_DELIVERY_NOTE.to_string()),
            ratings_average: DEFAULT_RATING,
            ratings_quantity: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(&mut self, update: UpdateProduct) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(brand) = update.brand {
            self.brand = brand;
        }
        if let Some(base_price) = update.base_price {
            self.base_price = base_price;
        }
        if let Some(images) = update.images {
            self.images = images;
        }
        if let Some(category_id) = update.category_id {
            self.category_id = Some(category_id);
        }
        if let Some(mark_id) = update.mark_id {
            self.mark_id = Some(mark_id);
        }
        if let Some(is_featured) = update.is_featured {
            self.is_featured = is_featured;
        }
        if let Some(flag) = update.is_our_offers_exciting {
            self.is_our_offers_exciting = flag;
        }
        if let Some(delivery_note) = update.delivery_note {
            self.delivery_note = delivery_note;
        }
        self.updated_at = Utc::now();
    }
}

/// Fields of a multipart product create
#[derive(Debug, Clone, Default, Validate, ToSchema)]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[validate(length(max = 100))]
    pub brand: Option<String>,
    #[validate(range(min = 0.0))]
    pub base_price: f64,
    pub category_id: Option<Uuid>,
    pub mark_id: Option<Uuid>,
    pub is_featured: Option<bool>,
    pub is_our_offers_exciting: Option<bool>,
    #[validate(length(max = 200))]
    pub delivery_note: Option<String>,
    #[schema(value_type = Vec<String>, format = Binary)]
    pub images: Vec<String>,
}

/// Fields of a multipart product update; images are set only when files were uploaded
#[derive(Debug, Clone, Default, Validate, ToSchema)]
pub struct UpdateProduct {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[validate(length(max = 100))]
    pub brand: Option<String>,
    #[validate(range(min = 0.0))]
    pub base_price: Option<f64>,
    pub category_id: Option<Uuid>,
    pub mark_id: Option<Uuid>,
    pub is_featured: Option<bool>,
    pub is_our_offers_exciting: Option<bool>,
    #[validate(length(max = 200))]
    pub delivery_note: Option<String>,
    #[schema(value_type = Option<Vec<String>>, format = Binary)]
    pub images: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
pub struct ProductFilter {
    pub category_id: Option<Uuid>,
    pub mark_id: Option<Uuid>,
    pub brand: Option<String>,
    pub is_featured: Option<bool>,
    pub is_our_offers_exciting: Option<bool>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// Case-insensitive match on name, description and brand
    pub search: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: u64,
}

/// A product with its category, mark and variants resolved
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductDetails {
    #[serde(flatten)]
    pub product: Product,
    pub category: Option<Category>,
    pub mark: Option<Mark>,
    pub variants: Vec<ProductVariant>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create() -> CreateProduct {
        CreateProduct {
            name: "Runner".into(),
            base_price: 249.5,
            ..Default::default()
        }
    }

    #[test]
    fn test_new_product_defaults() {
        let product = Product::new(create());
        assert_eq!(product.delivery_note, DEFAULT_DELIVERY_NOTE);
        assert_eq!(product.ratings_average, 4.5);
        assert_eq!(product.ratings_quantity, 0);
        assert_eq!(product.num_of_orders, 0);
        assert!(!product.is_featured);
    }

    #[test]
    fn test_update_keeps_images_without_upload() {
        let mut product = Product::new(CreateProduct {
            images: vec!["uploads/a.png".into()],
            ..create()
        });

        product.apply_update(UpdateProduct {
            name: Some("Runner 2".into()),
            ..Default::default()
        });
        assert_eq!(product.images, vec!["uploads/a.png"]);

        product.apply_update(UpdateProduct {
            images: Some(vec!["uploads/b.png".into()]),
            ..Default::default()
        });
        assert_eq!(product.images, vec!["uploads/b.png"]);
        assert_eq!(product.name, "Runner 2");
    }

    #[test]
    fn test_negative_price_fails_validation() {
        let input = CreateProduct {
            base_price: -1.0,
            ..create()
        };
        assert!(input.validate().is_err());
    }
}
