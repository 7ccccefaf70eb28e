use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Document, doc},
    options::IndexOptions,
};
use tracing::instrument;
use uuid::Uuid;

use super::{id_filter, page, uuid_bson};
use crate::error::{ContentError, ContentResult};
use crate::models::{Video, VideoFilter};
use crate::repository::VideoRepository;

pub struct MongoVideoRepository {
    collection: Collection<Video>,
}

impl MongoVideoRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<Video>("videos"),
        }
    }

    pub async fn init_indexes(&self) -> ContentResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "product_id": 1, "is_active": 1 })
            .options(IndexOptions::builder().name("idx_product_active".to_string()).build())
            .build();

        self.collection.create_index(index).await?;
        tracing::info!("Video indexes initialized");
        Ok(())
    }

    fn build_filter(filter: &VideoFilter) -> Document {
        let mut doc = Document::new();
        if let Some(product_id) = filter.product_id {
            doc.insert("product_id", uuid_bson(product_id));
        }
        if let Some(is_active) = filter.is_active {
            doc.insert("is_active", is_active);
        }
        doc
    }
}

#[async_trait]
impl VideoRepository for MongoVideoRepository {
    #[instrument(skip(self, video), fields(video_id = %video.id, product_id = %video.product_id))]
    async fn create(&self, video: Video) -> ContentResult<Video> {
        self.collection.insert_one(&video).await?;
        tracing::info!(video_id = %video.id, "Video created");
        Ok(video)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> ContentResult<Option<Video>> {
        Ok(self.collection.find_one(id_filter(id)).await?)
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: VideoFilter) -> ContentResult<Vec<Video>> {
        let cursor = self
            .collection
            .find(Self::build_filter(&filter))
            .with_options(page(filter.limit, filter.offset))
            .await?;
        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self, video), fields(video_id = %video.id))]
    async fn update(&self, video: Video) -> ContentResult<Video> {
        let result = self
            .collection
            .replace_one(id_filter(video.id), &video)
            .await?;
        if result.matched_count == 0 {
            return Err(ContentError::VideoNotFound(video.id));
        }
        Ok(video)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> ContentResult<bool> {
        let result = self.collection.delete_one(id_filter(id)).await?;
        Ok(result.deleted_count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_by_product() {
        let product_id = Uuid::now_v7();
        let filter = VideoFilter {
            product_id: Some(product_id),
            is_active: Some(true),
            ..Default::default()
        };
        let doc = MongoVideoRepository::build_filter(&filter);
        assert!(doc.get_bool("is_active").unwrap());
        assert_eq!(doc.get("product_id"), Some(&uuid_bson(product_id)));
    }
}
