//! Catalog service - business rules spanning the catalog collections
//!
//! Relationships are stored once on the child record, so the service is
//! where references get checked and where deletes cascade.

mod categories;
mod marks;
mod products;
mod reviews;
mod variants;

use std::sync::Arc;
use validator::Validate;

use crate::error::{CatalogError, CatalogResult};
use crate::repository::{
    CategoryRepository, MarkRepository, ProductRepository, ReviewRepository, VariantRepository,
};

/// The repositories the catalog is built on
#[derive(Clone)]
pub struct CatalogRepositories {
    pub products: Arc<dyn ProductRepository>,
    pub variants: Arc<dyn VariantRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub marks: Arc<dyn MarkRepository>,
    pub reviews: Arc<dyn ReviewRepository>,
}

#[derive(Clone)]
pub struct CatalogService {
    products: Arc<dyn ProductRepository>,
    variants: Arc<dyn VariantRepository>,
    categories: Arc<dyn CategoryRepository>,
    marks: Arc<dyn MarkRepository>,
    reviews: Arc<dyn ReviewRepository>,
}

impl CatalogService {
    pub fn new(repos: CatalogRepositories) -> Self {
        Self {
            products: repos.products,
            variants: repos.variants,
            categories: repos.categories,
            marks: repos.marks,
            reviews: repos.reviews,
        }
    }
}

pub(crate) fn validate<T: Validate>(input: &T) -> CatalogResult<()> {
    input
        .validate()
        .map_err(|e| CatalogError::Validation(e.to_string()))
}
