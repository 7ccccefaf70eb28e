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
use crate::models::{Banner, BannerFilter};
use crate::repository::BannerRepository;

pub struct MongoBannerRepository {
    collection: Collection<Banner>,
}

impl MongoBannerRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<Banner>("banners"),
        }
    }

    pub async fn init_indexes(&self) -> ContentResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "category_id": 1 })
            .options(IndexOptions::builder().name("idx_category".to_string()).build())
            .build();

        self.collection.create_index(index).await?;
        tracing::info!("Banner indexes initialized");
        Ok(())
    }

    fn build_filter(filter: &BannerFilter) -> Document {
        let mut doc = Document::new();
        if let Some(category_id) = filter.category_id {
            doc.insert("category_id", uuid_bson(category_id));
        }
        if let Some(flag) = filter.is_middle_banner {
            doc.insert("is_middle_banner", flag);
        }
        if let Some(flag) = filter.is_product_details_banner {
            doc.insert("is_product_details_banner", flag);
        }
        doc
    }
}

#[async_trait]
impl BannerRepository for MongoBannerRepository {
    #[instrument(skip(self, banner), fields(banner_id = %banner.id))]
    async fn create(&self, banner: Banner) -> ContentResult<Banner> {
        self.collection.insert_one(&banner).await?;
        tracing::info!(banner_id = %banner.id, name = %banner.name, "Banner created");
        Ok(banner)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> ContentResult<Option<Banner>> {
        Ok(self.collection.find_one(id_filter(id)).await?)
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: BannerFilter) -> ContentResult<Vec<Banner>> {
        let cursor = self
            .collection
            .find(Self::build_filter(&filter))
            .with_options(page(filter.limit, filter.offset))
            .await?;
        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self, banner), fields(banner_id = %banner.id))]
    async fn update(&self, banner: Banner) -> ContentResult<Banner> {
        let result = self
            .collection
            .replace_one(id_filter(banner.id), &banner)
            .await?;
        if result.matched_count == 0 {
            return Err(ContentError::BannerNotFound(banner.id));
        }
        Ok(banner)
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
    fn test_build_filter_flags() {
        let filter = BannerFilter {
            is_middle_banner: Some(false),
            ..Default::default()
        };
        let doc = MongoBannerRepository::build_filter(&filter);
        assert!(!doc.get_bool("is_middle_banner").unwrap());
        assert!(!doc.contains_key("is_product_details_banner"));
        assert!(!doc.contains_key("category_id"));
    }
}
