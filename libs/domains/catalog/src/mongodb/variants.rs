use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Document, doc},
    options::{FindOptions, IndexOptions},
};
use tracing::instrument;
use uuid::Uuid;

use super::{id_filter, in_filter, uuid_bson};
use crate::error::{CatalogError, CatalogResult};
use crate::models::{ProductVariant, VariantFilter};
use crate::repository::VariantRepository;

pub struct MongoVariantRepository {
    collection: Collection<ProductVariant>,
}

impl MongoVariantRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<ProductVariant>("product_variants"),
        }
    }

    pub async fn init_indexes(&self) -> CatalogResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "product_id": 1, "created_at": 1 })
            .options(IndexOptions::builder().name("idx_product".to_string()).build())
            .build();

        self.collection.create_index(index).await?;
        tracing::info!("Variant indexes initialized");
        Ok(())
    }

    fn build_filter(filter: &VariantFilter) -> Document {
        let mut doc = Document::new();
        if let Some(product_id) = filter.product_id {
            doc.insert("product_id", uuid_bson(product_id));
        }
        doc
    }
}

#[async_trait]
impl VariantRepository for MongoVariantRepository {
    #[instrument(skip(self, variant), fields(variant_id = %variant.id, product_id = %variant.product_id))]
    async fn create(&self, variant: ProductVariant) -> CatalogResult<ProductVariant> {
        self.collection.insert_one(&variant).await?;
        tracing::info!(variant_id = %variant.id, "Variant created");
        Ok(variant)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> CatalogResult<Option<ProductVariant>> {
        Ok(self.collection.find_one(id_filter(id)).await?)
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: VariantFilter) -> CatalogResult<Vec<ProductVariant>> {
        let options = FindOptions::builder()
            .limit(filter.limit)
            .skip(filter.offset)
            .sort(doc! { "created_at": 1 })
            .build();

        let cursor = self
            .collection
            .find(Self::build_filter(&filter))
            .with_options(options)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self, product_ids), fields(products = product_ids.len()))]
    async fn list_by_products(&self, product_ids: Vec<Uuid>) -> CatalogResult<Vec<ProductVariant>> {
        if product_ids.is_empty() {
            return Ok(Vec::new());
        }
        let cursor = self
            .collection
            .find(in_filter("product_id", &product_ids))
            .sort(doc! { "created_at": 1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self, variant), fields(variant_id = %variant.id))]
    async fn update(&self, variant: ProductVariant) -> CatalogResult<ProductVariant> {
        let result = self
            .collection
            .replace_one(id_filter(variant.id), &variant)
            .await?;
        if result.matched_count == 0 {
            return Err(CatalogError::VariantNotFound(variant.id));
        }
        Ok(variant)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> CatalogResult<bool> {
        let result = self.collection.delete_one(id_filter(id)).await?;
        Ok(result.deleted_count > 0)
    }

    #[instrument(skip(self))]
    async fn delete_by_product(&self, product_id: Uuid) -> CatalogResult<u64> {
        let result = self
            .collection
            .delete_many(doc! { "product_id": uuid_bson(product_id) })
            .await?;
        if result.deleted_count > 0 {
            tracing::info!(%product_id, deleted = result.deleted_count, "Variants removed");
        }
        Ok(result.deleted_count)
    }
}
