use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::default_limit;

/// Fallback artwork shown where a record has no image of its own
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DefaultImage {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub name: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DefaultImage {
    pub fn new(input: CreateDefaultImage) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: input.name,
            image: input.image,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(&mut self, update: UpdateDefaultImage) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(image) = update.image {
            self.image = Some(image);
        }
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Default, Validate, ToSchema)]
pub struct CreateDefaultImage {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[schema(value_type = Option<String>, format = Binary)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Validate, ToSchema)]
pub struct UpdateDefaultImage {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[schema(value_type = Option<String>, format = Binary)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
pub struct DefaultImageFilter {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: u64,
}
