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
use crate::models::{Product, ProductFilter};
use crate::repository::ProductRepository;

pub struct MongoProductRepository {
    collection: Collection<Product>,
}

impl MongoProductRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<Product>("products"),
        }
    }

    pub async fn init_indexes(&self) -> CatalogResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "category_id": 1, "created_at": -1 })
                .options(IndexOptions::builder().name("idx_category".to_string()).build())
                .build(),
            IndexModel::builder()
                .keys(doc! { "mark_id": 1 })
                .options(IndexOptions::builder().name("idx_mark".to_string()).build())
                .build(),
            IndexModel::builder()
                .keys(doc! { "base_price": 1 })
                .options(IndexOptions::builder().name("idx_base_price".to_string()).build())
                .build(),
            IndexModel::builder()
                .keys(doc! { "is_featured": 1 })
                .options(IndexOptions::builder().name("idx_featured".to_string()).build())
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Product indexes initialized");
        Ok(())
    }

    pub(crate) fn build_filter(filter: &ProductFilter) -> Document {
        let mut doc = Document::new();

        if let Some(category_id) = filter.category_id {
            doc.insert("category_id", uuid_bson(category_id));
        }
        if let Some(mark_id) = filter.mark_id {
            doc.insert("mark_id", uuid_bson(mark_id));
        }
        if let Some(brand) = &filter.brand {
            doc.insert("brand", brand);
        }
        if let Some(is_featured) = filter.is_featured {
            doc.insert("is_featured", is_featured);
        }
        if let Some(flag) = filter.is_our_offers_exciting {
            doc.insert("is_our_offers_exciting", flag);
        }

        let mut price = Document::new();
        if let Some(min) = filter.min_price {
            price.insert("$gte", min);
        }
        if let Some(max) = filter.max_price {
            price.insert("$lte", max);
        }
        if !price.is_empty() {
            doc.insert("base_price", price);
        }

        if let Some(search) = &filter.search {
            let pattern = database::mongodb::escape_regex(search);
            doc.insert(
                "$or",
                vec![
                    doc! { "name": { "$regex": &pattern, "$options": "i" } },
                    doc! { "description": { "$regex": &pattern, "$options": "i" } },
                    doc! { "brand": { "$regex": &pattern, "$options": "i" } },
                ],
            );
        }

        doc
    }

    async fn unset_reference(&self, field: &str, id: Uuid) -> CatalogResult<u64> {
        let result = self
            .collection
            .update_many(
                doc! { field: uuid_bson(id) },
                doc! { "$set": { field: Bson::Null, "updated_at": now_bson() } },
            )
            .await?;
        Ok(result.modified_count)
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    async fn create(&self, product: Product) -> CatalogResult<Product> {
        self.collection.insert_one(&product).await?;
        tracing::info!(product_id = %product.id, "Product created");
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> CatalogResult<Option<Product>> {
        Ok(self.collection.find_one(id_filter(id)).await?)
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: ProductFilter) -> CatalogResult<Vec<Product>> {
        let options = FindOptions::builder()
            .limit(filter.limit)
            .skip(filter.offset)
            .sort(doc! { "created_at": -1 })
            .build();

        let cursor = self
            .collection
            .find(Self::build_filter(&filter))
            .with_options(options)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self, mark_ids), fields(marks = mark_ids.len()))]
    async fn list_by_marks(&self, mark_ids: Vec<Uuid>) -> CatalogResult<Vec<Product>> {
        if mark_ids.is_empty() {
            return Ok(Vec::new());
        }
        let cursor = self
            .collection
            .find(in_filter("mark_id", &mark_ids))
            .sort(doc! { "created_at": -1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self, product), fields(product_id = %product.id))]
    async fn update(&self, product: Product) -> CatalogResult<Product> {
        let result = self
            .collection
            .replace_one(id_filter(product.id), &product)
            .await?;
        if result.matched_count == 0 {
            return Err(CatalogError::ProductNotFound(product.id));
        }
        tracing::info!(product_id = %product.id, "Product updated");
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> CatalogResult<bool> {
        let result = self.collection.delete_one(id_filter(id)).await?;
        Ok(result.deleted_count > 0)
    }

    #[instrument(skip(self))]
    async fn detach_category(&self, category_id: Uuid) -> CatalogResult<u64> {
        self.unset_reference("category_id", category_id).await
    }

    #[instrument(skip(self))]
    async fn detach_mark(&self, mark_id: Uuid) -> CatalogResult<u64> {
        self.unset_reference("mark_id", mark_id).await
    }

    #[instrument(skip(self))]
    async fn set_ratings(&self, id: Uuid, average: f64, quantity: i64) -> CatalogResult<()> {
        self.collection
            .update_one(
                id_filter(id),
                doc! {
                    "$set": {
                        "ratings_average": average,
                        "ratings_quantity": quantity,
                        "updated_at": now_bson(),
                    }
                },
            )
            .await?;
        tracing::debug!(product_id = %id, average, quantity, "Ratings updated");
        Ok(())
    }
}
