use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Bson, Document, doc},
    options::{FindOptions, IndexOptions},
};
use tracing::instrument;
use uuid::Uuid;

use super::{id_filter, in_filter, now_bson, uuid_bson};
use crate::error::{CatalogError, CatalogResult};
use crate::models::{Category, CategoryFilter};
use crate::repository::CategoryRepository;

pub struct MongoCategoryRepository {
    collection: Collection<Category>,
}

impl MongoCategoryRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<Category>("categories"),
        }
    }

    pub async fn init_indexes(&self) -> CatalogResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "slug": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name("idx_slug_unique".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "parent_id": 1 })
                .options(IndexOptions::builder().name("idx_parent".to_string()).build())
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Category indexes initialized");
        Ok(())
    }

    fn build_filter(filter: &CategoryFilter) -> Document {
        let mut doc = Document::new();
        if let Some(parent_id) = filter.parent_id {
            doc.insert("parent_id", uuid_bson(parent_id));
        }
        if let Some(is_active) = filter.is_active {
            doc.insert("is_active", is_active);
        }
        doc
    }

    fn map_write_error(err: mongodb::error::Error, slug: &str) -> CatalogError {
        if database::mongodb::is_duplicate_key_error(&err) {
            CatalogError::DuplicateSlug(slug.to_string())
        } else {
            CatalogError::Database(err.to_string())
        }
    }
}

#[async_trait]
impl CategoryRepository for MongoCategoryRepository {
    #[instrument(skip(self, category), fields(category_id = %category.id, slug = %category.slug))]
    async fn create(&self, category: Category) -> CatalogResult<Category> {
        self.collection
            .insert_one(&category)
            .await
            .map_err(|e| Self::map_write_error(e, &category.slug))?;
        tracing::info!(category_id = %category.id, "Category created");
        Ok(category)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> CatalogResult<Option<Category>> {
        Ok(self.collection.find_one(id_filter(id)).await?)
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn get_many(&self, ids: Vec<Uuid>) -> CatalogResult<Vec<Category>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let cursor = self.collection.find(in_filter("_id", &ids)).await?;
        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: CategoryFilter) -> CatalogResult<Vec<Category>> {
        let options = FindOptions::builder()
            .limit(filter.limit)
            .skip(filter.offset)
            .sort(doc! { "name": 1 })
            .build();

        let cursor = self
            .collection
            .find(Self::build_filter(&filter))
            .with_options(options)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self, category), fields(category_id = %category.id))]
    async fn update(&self, category: Category) -> CatalogResult<Category> {
        let result = self
            .collection
            .replace_one(id_filter(category.id), &category)
            .await
            .map_err(|e| Self::map_write_error(e, &category.slug))?;
        if result.matched_count == 0 {
            return Err(CatalogError::CategoryNotFound(category.id));
        }
        Ok(category)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> CatalogResult<bool> {
        let result = self.collection.delete_one(id_filter(id)).await?;
        Ok(result.deleted_count > 0)
    }

    #[instrument(skip(self))]
    async fn detach_children(&self, parent_id: Uuid) -> CatalogResult<u64> {
        let result = self
            .collection
            .update_many(
                doc! { "parent_id": uuid_bson(parent_id) },
                doc! { "$set": { "parent_id": Bson::Null, "updated_at": now_bson() } },
            )
            .await?;
        Ok(result.modified_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter() {
        let filter = CategoryFilter {
            parent_id: Some(Uuid::now_v7()),
            is_active: Some(false),
            ..Default::default()
        };
        let doc = MongoCategoryRepository::build_filter(&filter);
        assert!(doc.contains_key("parent_id"));
        assert!(!doc.get_bool("is_active").unwrap());
    }
}
