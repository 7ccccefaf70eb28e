use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::default_limit;

/// One user's rating of a product; unique per `(product_id, user_id)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Review {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub product_id: Uuid,
    pub user_id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Review {
    pub fn new(input: CreateReview, user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            product_id: input.product_id,
            user_id,
            rating: input.rating,
            comment: input.comment,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(&mut self, update: UpdateReview) {
        if let Some(rating) = update.rating {
            self.rating = rating;
        }
        if let Some(comment) = update.comment {
            self.comment = Some(comment);
        }
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateReview {
    pub product_id: Uuid,
    /// Defaults to the authenticated caller
    pub user_id: Option<Uuid>,
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,
    #[validate(length(max = 500))]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateReview {
    #[validate(range(min = 1, max = 5))]
    pub rating: Option<i32>,
    #[validate(length(max = 500))]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
pub struct ReviewFilter {
    pub product_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: u64,
}

/// Aggregate of a product's reviews
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RatingStats {
    pub count: i64,
    /// `None` when there are no reviews
    pub average: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        let review = CreateReview {
            product_id: Uuid::now_v7(),
            user_id: None,
            rating: 6,
            comment: None,
        };
        assert!(review.validate().is_err());

        let update = UpdateReview {
            rating: Some(0),
            comment: None,
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_comment_length() {
        let review = CreateReview {
            product_id: Uuid::now_v7(),
            user_id: None,
            rating: 4,
            comment: Some("x".repeat(501)),
        };
        assert!(review.validate().is_err());
    }
}
