//! Catalog entities and DTOs.
//!
//! Memberships are never stored on the parent: a product points at its
//! category and mark, a variant and a review point at their product.

mod category;
mod mark;
mod product;
mod review;
mod variant;

pub use category::{Category, CategoryFilter, CreateCategory, UpdateCategory, slugify};
pub use mark::{CreateMark, Mark, MarkFilter, MarkWithProducts, UpdateMark};
pub use product::{
    CreateProduct, DEFAULT_DELIVERY_NOTE, DEFAULT_RATING, Product, ProductDetails, ProductFilter,
    UpdateProduct,
};
pub use review::{CreateReview, RatingStats, Review, ReviewFilter, UpdateReview};
pub use variant::{CreateVariant, ProductVariant, UpdateVariant, VariantAttributes, VariantFilter};

pub(crate) fn default_limit() -> i64 {
    50
}
