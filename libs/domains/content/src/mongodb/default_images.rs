use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{Collection, Database, bson::doc};
use tracing::instrument;
use uuid::Uuid;

use super::{id_filter, page};
use crate::error::{ContentError, ContentResult};
use crate::models::{DefaultImage, DefaultImageFilter};
use crate::repository::DefaultImageRepository;

pub struct MongoDefaultImageRepository {
    collection: Collection<DefaultImage>,
}

impl MongoDefaultImageRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<DefaultImage>("default_images"),
        }
    }
}

#[async_trait]
impl DefaultImageRepository for MongoDefaultImageRepository {
    #[instrument(skip(self, image), fields(image_id = %image.id))]
    async fn create(&self, image: DefaultImage) -> ContentResult<DefaultImage> {
        self.collection.insert_one(&image).await?;
        Ok(image)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> ContentResult<Option<DefaultImage>> {
        Ok(self.collection.find_one(id_filter(id)).await?)
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: DefaultImageFilter) -> ContentResult<Vec<DefaultImage>> {
        let cursor = self
            .collection
            .find(doc! {})
            .with_options(page(filter.limit, filter.offset))
            .await?;
        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self, image), fields(image_id = %image.id))]
    async fn update(&self, image: DefaultImage) -> ContentResult<DefaultImage> {
        let result = self
            .collection
            .replace_one(id_filter(image.id), &image)
            .await?;
        if result.matched_count == 0 {
            return Err(ContentError::DefaultImageNotFound(image.id));
        }
        Ok(image)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> ContentResult<bool> {
        let result = self.collection.delete_one(id_filter(id)).await?;
        Ok(result.deleted_count > 0)
    }
}
