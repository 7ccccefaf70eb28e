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
use crate::error::{CommerceError, CommerceResult};
use crate::models::{ReturnFilter, ReturnRequest};
use crate::repository::ReturnRepository;

pub struct MongoReturnRepository {
    collection: Collection<ReturnRequest>,
}

impl MongoReturnRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<ReturnRequest>("returns"),
        }
    }

    pub async fn init_indexes(&self) -> CommerceResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "order_id": 1 })
                .options(IndexOptions::builder().name("idx_order".to_string()).build())
                .build(),
            IndexModel::builder()
                .keys(doc! { "user_id": 1, "created_at": -1 })
                .options(IndexOptions::builder().name("idx_user".to_string()).build())
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Return indexes initialized");
        Ok(())
    }

    fn build_filter(filter: &ReturnFilter) -> Document {
        let mut doc = Document::new();
        if let Some(user_id) = filter.user_id {
            doc.insert("user_id", uuid_bson(user_id));
        }
        if let Some(order_id) = filter.order_id {
            doc.insert("order_id", uuid_bson(order_id));
        }
        if let Some(status) = filter.status {
            doc.insert("status", status.to_string());
        }
        doc
    }
}

#[async_trait]
impl ReturnRepository for MongoReturnRepository {
    #[instrument(skip(self, request), fields(return_id = %request.id, order_id = %request.order_id))]
    async fn create(&self, request: ReturnRequest) -> CommerceResult<ReturnRequest> {
        self.collection.insert_one(&request).await?;
        tracing::info!(return_id = %request.id, "Return requested");
        Ok(request)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> CommerceResult<Option<ReturnRequest>> {
        Ok(self.collection.find_one(id_filter(id)).await?)
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: ReturnFilter) -> CommerceResult<Vec<ReturnRequest>> {
        let cursor = self
            .collection
            .find(Self::build_filter(&filter))
            .with_options(page(filter.limit, filter.offset))
            .await?;
        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self, request), fields(return_id = %request.id, status = %request.status))]
    async fn update(&self, request: ReturnRequest) -> CommerceResult<ReturnRequest> {
        let result = self
            .collection
            .replace_one(id_filter(request.id), &request)
            .await?;
        if result.matched_count == 0 {
            return Err(CommerceError::ReturnNotFound(request.id));
        }
        Ok(request)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> CommerceResult<bool> {
        let result = self.collection.delete_one(id_filter(id)).await?;
        Ok(result.deleted_count > 0)
    }
}
