use std::collections::HashSet;

use tracing::instrument;
use uuid::Uuid;

use super::{CatalogService, validate};
use crate::error::{CatalogError, CatalogResult};
use crate::models::{
    Category, CategoryFilter, CreateCategory, Product, ProductFilter, UpdateCategory,
};

impl CatalogService {
    async fn find_category(&self, id: Uuid) -> CatalogResult<Category> {
        self.categories
            .get_by_id(id)
            .await?
            .ok_or(CatalogError::CategoryNotFound(id))
    }

    /// Check that `parent_id` can become the parent of `child`.
    ///
    /// Walks up from the proposed parent; meeting `child` on the way means
    /// the edge would close a loop.
    async fn ensure_parent(&self, child: Option<Uuid>, parent_id: Uuid) -> CatalogResult<()> {
        if child == Some(parent_id) {
            return Err(CatalogError::CategoryCycle);
        }

        let mut seen = HashSet::new();
        let mut cursor = Some(parent_id);
        while let Some(id) = cursor {
            if !seen.insert(id) {
                break;
            }
            let category = self.categories.get_by_id(id).await?.ok_or(
                CatalogError::InvalidReference {
                    entity: "category",
                    id,
                },
            )?;
            if child.is_some() && category.parent_id == child {
                return Err(CatalogError::CategoryCycle);
            }
            cursor = category.parent_id;
        }
        Ok(())
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_category(&self, input: CreateCategory) -> CatalogResult<Category> {
        validate(&input)?;
        if let Some(parent_id) = input.parent_id {
            self.ensure_parent(None, parent_id).await?;
        }

        self.categories.create(Category::new(input)).await
    }

    #[instrument(skip(self))]
    pub async fn get_category(&self, id: Uuid) -> CatalogResult<Category> {
        self.find_category(id).await
    }

    #[instrument(skip(self))]
    pub async fn list_categories(&self, filter: CategoryFilter) -> CatalogResult<Vec<Category>> {
        self.categories.list(filter).await
    }

    /// Products whose `category_id` points at this category
    #[instrument(skip(self))]
    pub async fn category_products(
        &self,
        id: Uuid,
        limit: i64,
        offset: u64,
    ) -> CatalogResult<Vec<Product>> {
        self.find_category(id).await?;
        self.products
            .list(ProductFilter {
                category_id: Some(id),
                limit,
                offset,
                ..Default::default()
            })
            .await
    }

    #[instrument(skip(self))]
    pub async fn category_children(
        &self,
        id: Uuid,
        limit: i64,
        offset: u64,
    ) -> CatalogResult<Vec<Category>> {
        self.find_category(id).await?;
        self.categories
            .list(CategoryFilter {
                parent_id: Some(id),
                limit,
                offset,
                ..Default::default()
            })
            .await
    }

    #[instrument(skip(self, input))]
    pub async fn update_category(
        &self,
        id: Uuid,
        input: UpdateCategory,
    ) -> CatalogResult<Category> {
        validate(&input)?;
        let mut category = self.find_category(id).await?;
        if let Some(parent_id) = input.parent_id {
            self.ensure_parent(Some(id), parent_id).await?;
        }

        category.apply_update(input);
        self.categories.update(category).await
    }

    /// Delete a category, leaving its products and children unparented
    #[instrument(skip(self))]
    pub async fn delete_category(&self, id: Uuid) -> CatalogResult<Category> {
        let category = self.find_category(id).await?;
        if !self.categories.delete(id).await? {
            return Err(CatalogError::CategoryNotFound(id));
        }

        let products = self.products.detach_category(id).await?;
        let children = self.categories.detach_children(id).await?;
        tracing::info!(category_id = %id, products, children, "Category deleted");
        Ok(category)
    }
}
