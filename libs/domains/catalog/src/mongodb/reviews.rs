use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Document, doc},
    options::{FindOptions, IndexOptions},
};
use tracing::instrument;
use uuid::Uuid;

use super::{id_filter, uuid_bson};
use crate::error::{CatalogError, CatalogResult};
use crate::models::{RatingStats, Review, ReviewFilter};
use crate::repository::ReviewRepository;

pub struct MongoReviewRepository {
    collection: Collection<Review>,
}

impl MongoReviewRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<Review>("reviews"),
        }
    }

    pub async fn init_indexes(&self) -> CatalogResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "product_id": 1, "user_id": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name("idx_product_user_unique".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "user_id": 1 })
                .options(IndexOptions::builder().name("idx_user".to_string()).build())
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Review indexes initialized");
        Ok(())
    }

    fn build_filter(filter: &ReviewFilter) -> Document {
        let mut doc = Document::new();
        if let Some(product_id) = filter.product_id {
            doc.insert("product_id", uuid_bson(product_id));
        }
        if let Some(user_id) = filter.user_id {
            doc.insert("user_id", uuid_bson(user_id));
        }
        doc
    }

    fn stats_pipeline(product_id: Uuid) -> Vec<Document> {
        vec![
            doc! { "$match": { "product_id": uuid_bson(product_id) } },
            doc! {
                "$group": {
                    "_id": "$product_id",
                    "count": { "$sum": 1 },
                    "average": { "$avg": "$rating" },
                }
            },
        ]
    }
}

#[async_trait]
impl ReviewRepository for MongoReviewRepository {
    #[instrument(skip(self, review), fields(review_id = %review.id, product_id = %review.product_id))]
    async fn create(&self, review: Review) -> CatalogResult<Review> {
        self.collection.insert_one(&review).await.map_err(|e| {
            if database::mongodb::is_duplicate_key_error(&e) {
                CatalogError::DuplicateReview
            } else {
                CatalogError::Database(e.to_string())
            }
        })?;
        tracing::info!(review_id = %review.id, "Review created");
        Ok(review)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> CatalogResult<Option<Review>> {
        Ok(self.collection.find_one(id_filter(id)).await?)
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: ReviewFilter) -> CatalogResult<Vec<Review>> {
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

    #[instrument(skip(self, review), fields(review_id = %review.id))]
    async fn update(&self, review: Review) -> CatalogResult<Review> {
        let result = self
            .collection
            .replace_one(id_filter(review.id), &review)
            .await?;
        if result.matched_count == 0 {
            return Err(CatalogError::ReviewNotFound(review.id));
        }
        Ok(review)
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
        Ok(result.deleted_count)
    }

    #[instrument(skip(self))]
    async fn rating_stats(&self, product_id: Uuid) -> CatalogResult<RatingStats> {
        let mut cursor = self
            .collection
            .aggregate(Self::stats_pipeline(product_id))
            .await?;

        let Some(group) = cursor.try_next().await? else {
            return Ok(RatingStats::default());
        };

        let count = match group.get("count") {
            Some(mongodb::bson::Bson::Int32(n)) => i64::from(*n),
            Some(mongodb::bson::Bson::Int64(n)) => *n,
            _ => 0,
        };
        let average = group.get_f64("average").ok();

        Ok(RatingStats { count, average })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter() {
        let filter = ReviewFilter {
            product_id: Some(Uuid::now_v7()),
            user_id: Some(Uuid::now_v7()),
            ..Default::default()
        };
        let doc = MongoReviewRepository::build_filter(&filter);
        assert!(doc.contains_key("product_id"));
        assert!(doc.contains_key("user_id"));
    }

    #[test]
    fn test_stats_pipeline_groups_by_product() {
        let pipeline = MongoReviewRepository::stats_pipeline(Uuid::now_v7());
        assert_eq!(pipeline.len(), 2);
        assert!(pipeline[0].contains_key("$match"));
        let group = pipeline[1].get_document("$group").unwrap();
        assert_eq!(group.get_document("average").unwrap().get_str("$avg").unwrap(), "$rating");
    }
}
