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
use crate::models::{Cart, CartFilter};
use crate::repository::CartRepository;

pub struct MongoCartRepository {
    collection: Collection<Cart>,
}

impl MongoCartRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<Cart>("carts"),
        }
    }

    pub async fn init_indexes(&self) -> CommerceResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "user_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("idx_user_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(index).await?;
        tracing::info!("Cart indexes initialized");
        Ok(())
    }

    fn build_filter(filter: &CartFilter) -> Document {
        let mut doc = Document::new();
        if let Some(user_id) = filter.user_id {
            doc.insert("user_id", uuid_bson(user_id));
        }
        doc
    }
}

#[async_trait]
impl CartRepository for MongoCartRepository {
    #[instrument(skip(self, cart), fields(cart_id = %cart.id, user_id = %cart.user_id))]
    async fn create(&self, cart: Cart) -> CommerceResult<Cart> {
        self.collection.insert_one(&cart).await.map_err(|e| {
            if database::mongodb::is_duplicate_key_error(&e) {
                CommerceError::CartExists(cart.user_id)
            } else {
                CommerceError::Database(e.to_string())
            }
        })?;
        tracing::info!(cart_id = %cart.id, "Cart created");
        Ok(cart)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> CommerceResult<Option<Cart>> {
        Ok(self.collection.find_one(id_filter(id)).await?)
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: CartFilter) -> CommerceResult<Vec<Cart>> {
        let cursor = self
            .collection
            .find(Self::build_filter(&filter))
            .with_options(page(filter.limit, filter.offset))
            .await?;
        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self, cart), fields(cart_id = %cart.id))]
    async fn update(&self, cart: Cart) -> CommerceResult<Cart> {
        let result = self.collection.replace_one(id_filter(cart.id), &cart).await?;
        if result.matched_count == 0 {
            return Err(CommerceError::CartNotFound(cart.id));
        }
        Ok(cart)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> CommerceResult<bool> {
        let result = self.collection.delete_one(id_filter(id)).await?;
        Ok(result.deleted_count > 0)
    }
}
