//! Data access traits for the catalog.
//!
//! Each trait owns one collection. Cross-collection rules (cascades,
//! reference checks, rating recomputation) live in the service.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::CatalogResult;
use crate::models::{
    Category, CategoryFilter, Mark, MarkFilter, Product, ProductFilter, ProductVariant,
    RatingStats, Review, ReviewFilter, VariantFilter,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create(&self, product: Product) -> CatalogResult<Product>;

    async fn get_by_id(&self, id: Uuid) -> CatalogResult<Option<Product>>;

    async fn list(&self, filter: ProductFilter) -> CatalogResult<Vec<Product>>;

    /// Products referencing any of the given marks
    async fn list_by_marks(&self, mark_ids: Vec<Uuid>) -> CatalogResult<Vec<Product>>;

    async fn update(&self, product: Product) -> CatalogResult<Product>;

    async fn delete(&self, id: Uuid) -> CatalogResult<bool>;

    /// Clear `category_id` on every product in the category; returns the count
    async fn detach_category(&self, category_id: Uuid) -> CatalogResult<u64>;

    /// Clear `mark_id` on every product of the mark; returns the count
    async fn detach_mark(&self, mark_id: Uuid) -> CatalogResult<u64>;

    async fn set_ratings(&self, id: Uuid, average: f64, quantity: i64) -> CatalogResult<()>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VariantRepository: Send + Sync {
    async fn create(&self, variant: ProductVariant) -> CatalogResult<ProductVariant>;

    async fn get_by_id(&self, id: Uuid) -> CatalogResult<Option<ProductVariant>>;

    async fn list(&self, filter: VariantFilter) -> CatalogResult<Vec<ProductVariant>>;

    /// Variants of any of the given products
    async fn list_by_products(&self, product_ids: Vec<Uuid>) -> CatalogResult<Vec<ProductVariant>>;

    async fn update(&self, variant: ProductVariant) -> CatalogResult<ProductVariant>;

    async fn delete(&self, id: Uuid) -> CatalogResult<bool>;

    async fn delete_by_product(&self, product_id: Uuid) -> CatalogResult<u64>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Insert; a taken slug is [`crate::CatalogError::DuplicateSlug`]
    async fn create(&self, category: Category) -> CatalogResult<Category>;

    async fn get_by_id(&self, id: Uuid) -> CatalogResult<Option<Category>>;

    async fn get_many(&self, ids: Vec<Uuid>) -> CatalogResult<Vec<Category>>;

    async fn list(&self, filter: CategoryFilter) -> CatalogResult<Vec<Category>>;

    async fn update(&self, category: Category) -> CatalogResult<Category>;

    async fn delete(&self, id: Uuid) -> CatalogResult<bool>;

    /// Clear `parent_id` on the direct children; returns the count
    async fn detach_children(&self, parent_id: Uuid) -> CatalogResult<u64>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarkRepository: Send + Sync {
    async fn create(&self, mark: Mark) -> CatalogResult<Mark>;

    async fn get_by_id(&self, id: Uuid) -> CatalogResult<Option<Mark>>;

    async fn get_many(&self, ids: Vec<Uuid>) -> CatalogResult<Vec<Mark>>;

    async fn list(&self, filter: MarkFilter) -> CatalogResult<Vec<Mark>>;

    async fn update(&self, mark: Mark) -> CatalogResult<Mark>;

    async fn delete(&self, id: Uuid) -> CatalogResult<bool>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Insert; a second review by the same user is [`crate::CatalogError::DuplicateReview`]
    async fn create(&self, review: Review) -> CatalogResult<Review>;

    async fn get_by_id(&self, id: Uuid) -> CatalogResult<Option<Review>>;

    async fn list(&self, filter: ReviewFilter) -> CatalogResult<Vec<Review>>;

    async fn update(&self, review: Review) -> CatalogResult<Review>;

    async fn delete(&self, id: Uuid) -> CatalogResult<bool>;

    async fn delete_by_product(&self, product_id: Uuid) -> CatalogResult<u64>;

    async fn rating_stats(&self, product_id: Uuid) -> CatalogResult<RatingStats>;
}
