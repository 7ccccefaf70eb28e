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
use crate::models::{Order, OrderFilter};
use crate::repository::OrderRepository;

pub struct MongoOrderRepository {
    collection: Collection<Order>,
}

impl MongoOrderRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<Order>("orders"),
        }
    }

    pub async fn init_indexes(&self) -> CommerceResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "user_id": 1, "created_at": -1 })
                .options(IndexOptions::builder().name("idx_user".to_string()).build())
                .build(),
            IndexModel::builder()
                .keys(doc! { "status": 1 })
                .options(IndexOptions::builder().name("idx_status".to_string()).build())
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Order indexes initialized");
        Ok(())
    }

    fn build_filter(filter: &OrderFilter) -> Document {
        let mut doc = Document::new();
        if let Some(user_id) = filter.user_id {
            doc.insert("user_id", uuid_bson(user_id));
        }
        if let Some(status) = filter.status {
            doc.insert("status", status.to_string());
        }
        doc
    }
}

#[async_trait]
impl OrderRepository for MongoOrderRepository {
    #[instrument(skip(self, order), fields(order_id = %order.id, user_id = %order.user_id))]
    async fn create(&self, order: Order) -> CommerceResult<Order> {
        self.collection.insert_one(&order).await?;
        tracing::info!(order_id = %order.id, total = order.total_price, "Order created");
        Ok(order)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> CommerceResult<Option<Order>> {
        Ok(self.collection.find_one(id_filter(id)).await?)
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: OrderFilter) -> CommerceResult<Vec<Order>> {
        let cursor = self
            .collection
            .find(Self::build_filter(&filter))
            .with_options(page(filter.limit, filter.offset))
            .await?;
        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self, order), fields(order_id = %order.id, status = %order.status))]
    async fn update(&self, order: Order) -> CommerceResult<Order> {
        let result = self
            .collection
            .replace_one(id_filter(order.id), &order)
            .await?;
        if result.matched_count == 0 {
            return Err(CommerceError::OrderNotFound(order.id));
        }
        Ok(order)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> CommerceResult<bool> {
        let result = self.collection.delete_one(id_filter(id)).await?;
        Ok(result.deleted_count > 0)
    }
}
