use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::doc,
    options::{FindOptions, IndexOptions},
};
use tracing::instrument;
use uuid::Uuid;

use super::{id_filter, in_filter};
use crate::error::{CatalogError, CatalogResult};
use crate::models::{Mark, MarkFilter};
use crate::repository::MarkRepository;

pub struct MongoMarkRepository {
    collection: Collection<Mark>,
}

impl MongoMarkRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<Mark>("marks"),
        }
    }

    pub async fn init_indexes(&self) -> CatalogResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "name": 1 })
            .options(IndexOptions::builder().name("idx_name".to_string()).build())
            .build();

        self.collection.create_index(index).await?;
        tracing::info!("Mark indexes initialized");
        Ok(())
    }
}

#[async_trait]
impl MarkRepository for MongoMarkRepository {
    #[instrument(skip(self, mark), fields(mark_id = %mark.id))]
    async fn create(&self, mark: Mark) -> CatalogResult<Mark> {
        self.collection.insert_one(&mark).await?;
        tracing::info!(mark_id = %mark.id, name = %mark.name, "Mark created");
        Ok(mark)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> CatalogResult<Option<Mark>> {
        Ok(self.collection.find_one(id_filter(id)).await?)
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn get_many(&self, ids: Vec<Uuid>) -> CatalogResult<Vec<Mark>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let cursor = self.collection.find(in_filter("_id", &ids)).await?;
        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: MarkFilter) -> CatalogResult<Vec<Mark>> {
        let options = FindOptions::builder()
            .limit(filter.limit)
            .skip(filter.offset)
            .sort(doc! { "name": 1 })
            .build();

        let cursor = self.collection.find(doc! {}).with_options(options).await?;
        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self, mark), fields(mark_id = %mark.id))]
    async fn update(&self, mark: Mark) -> CatalogResult<Mark> {
        let result = self.collection.replace_one(id_filter(mark.id), &mark).await?;
        if result.matched_count == 0 {
            return Err(CatalogError::MarkNotFound(mark.id));
        }
        Ok(mark)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> CatalogResult<bool> {
        let result = self.collection.delete_one(id_filter(id)).await?;
        Ok(result.deleted_count > 0)
    }
}
