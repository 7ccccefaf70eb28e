use tracing::instrument;
use uuid::Uuid;

use super::{CatalogService, validate};
use crate::error::{CatalogError, CatalogResult};
use crate::models::{CreateReview, DEFAULT_RATING, Review, ReviewFilter, UpdateReview};

impl CatalogService {
    async fn find_review(&self, id: Uuid) -> CatalogResult<Review> {
        self.reviews
            .get_by_id(id)
            .await?
            .ok_or(CatalogError::ReviewNotFound(id))
    }

    /// Recompute `ratings_average`/`ratings_quantity` from the product's reviews
    #[instrument(skip(self))]
    async fn refresh_ratings(&self, product_id: Uuid) -> CatalogResult<()> {
        let stats = self.reviews.rating_stats(product_id).await?;
        let average = match stats.average {
            Some(avg) if stats.count > 0 => avg,
            _ => DEFAULT_RATING,
        };
        self.products
            .set_ratings(product_id, average, stats.count)
            .await
    }

    /// Create a review; `user_id` falls back to the caller
    #[instrument(skip(self, input), fields(product_id = %input.product_id))]
    pub async fn create_review(&self, input: CreateReview, caller: Uuid) -> CatalogResult<Review> {
        validate(&input)?;
        let product_id = input.product_id;
        if self.products.get_by_id(product_id).await?.is_none() {
            return Err(CatalogError::InvalidReference {
                entity: "product",
                id: product_id,
            });
        }

        let user_id = input.user_id.unwrap_or(caller);
        let review = self.reviews.create(Review::new(input, user_id)).await?;
        self.refresh_ratings(product_id).await?;
        Ok(review)
    }

    #[instrument(skip(self))]
    pub async fn get_review(&self, id: Uuid) -> CatalogResult<Review> {
        self.find_review(id).await
    }

    #[instrument(skip(self))]
    pub async fn list_reviews(&self, filter: ReviewFilter) -> CatalogResult<Vec<Review>> {
        self.reviews.list(filter).await
    }

    #[instrument(skip(self, input))]
    pub async fn update_review(&self, id: Uuid, input: UpdateReview) -> CatalogResult<Review> {
        validate(&input)?;
        let mut review = self.find_review(id).await?;
        review.apply_update(input);

        let review = self.reviews.update(review).await?;
        self.refresh_ratings(review.product_id).await?;
        Ok(review)
    }

    #[instrument(skip(self))]
    pub async fn delete_review(&self, id: Uuid) -> CatalogResult<()> {
        let review = self.find_review(id).await?;
        if !self.reviews.delete(id).await? {
            return Err(CatalogError::ReviewNotFound(id));
        }
        self.refresh_ratings(review.product_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreateProduct, Product, RatingStats};
    use crate::service::test_support::Mocks;

    fn product() -> Product {
        Product::new(CreateProduct {
            name: "Runner".into(),
            base_price: 100.0,
            ..Default::default()
        })
    }

    fn create(product_id: Uuid) -> CreateReview {
        CreateReview {
            product_id,
            user_id: None,
            rating: 4,
            comment: Some("Comfortable".into()),
        }
    }

    #[tokio::test]
    async fn test_create_defaults_user_and_recomputes_ratings() {
        let product = product();
        let product_id = product.id;
        let caller = Uuid::now_v7();

        let mut mocks = Mocks::default();
        mocks
            .products
            .expect_get_by_id()
            .returning(move |_| Ok(Some(product.clone())));
        mocks.reviews.expect_create().returning(Ok);
        mocks.reviews.expect_rating_stats().returning(|_| {
            Ok(RatingStats {
                count: 2,
                average: Some(3.5),
            })
        });
        mocks
            .products
            .expect_set_ratings()
            .withf(move |id, avg, qty| *id == product_id && *avg == 3.5 && *qty == 2)
            .times(1)
            .returning(|_, _, _| Ok(()));

        let review = mocks
            .into_service()
            .create_review(create(product_id), caller)
            .await
            .unwrap();

        assert_eq!(review.user_id, caller);
    }

    #[tokio::test]
    async fn test_create_for_missing_product() {
        let mut mocks = Mocks::default();
        mocks.products.expect_get_by_id().returning(|_| Ok(None));
        mocks.reviews.expect_create().never();

        let result = mocks
            .into_service()
            .create_review(create(Uuid::now_v7()), Uuid::now_v7())
            .await;

        assert!(matches!(result, Err(CatalogError::InvalidReference { .. })));
    }

    #[tokio::test]
    async fn test_duplicate_review_skips_recompute() {
        let product = product();
        let product_id = product.id;

        let mut mocks = Mocks::default();
        mocks
            .products
            .expect_get_by_id()
            .returning(move |_| Ok(Some(product.clone())));
        mocks
            .reviews
            .expect_create()
            .returning(|_| Err(CatalogError::DuplicateReview));
        mocks.products.expect_set_ratings().never();

        let result = mocks
            .into_service()
            .create_review(create(product_id), Uuid::now_v7())
            .await;

        assert!(matches!(result, Err(CatalogError::DuplicateReview)));
    }

    #[tokio::test]
    async fn test_delete_last_review_restores_default_rating() {
        let review = Review::new(create(Uuid::now_v7()), Uuid::now_v7());
        let id = review.id;

        let mut mocks = Mocks::default();
        mocks
            .reviews
            .expect_get_by_id()
            .returning(move |_| Ok(Some(review.clone())));
        mocks.reviews.expect_delete().returning(|_| Ok(true));
        mocks
            .reviews
            .expect_rating_stats()
            .returning(|_| Ok(RatingStats::default()));
        mocks
            .products
            .expect_set_ratings()
            .withf(|_, avg, qty| *avg == 4.5 && *qty == 0)
            .times(1)
            .returning(|_, _, _| Ok(()));

        mocks.into_service().delete_review(id).await.unwrap();
    }
}
