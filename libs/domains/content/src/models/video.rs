use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::default_limit;

/// A product video hosted elsewhere
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Video {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub product_id: Uuid,
    pub video_url: String,
    pub caption: Option<String>,
    pub thumbnail: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Video {
    pub fn new(input: CreateVideo) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            product_id: input.product_id,
            video_url: input.video_url,
            caption: input.caption,
            thumbnail: input.thumbnail,
            is_active: input.is_active,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(&mut self, update: UpdateVideo) {
        if let Some(product_id) = update.product_id {
            self.product_id = product_id;
        }
        if let Some(video_url) = update.video_url {
            self.video_url = video_url;
        }
        if let Some(caption) = update.caption {
            self.caption = Some(caption);
        }
        if let Some(thumbnail) = update.thumbnail {
            self.thumbnail = Some(thumbnail);
        }
        if let Some(is_active) = update.is_active {
            self.is_active = is_active;
        }
        self.updated_at = Utc::now();
    }
}

fn active() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateVideo {
    pub product_id: Uuid,
    #[validate(url)]
    pub video_url: String,
    #[validate(length(max = 500))]
    pub caption: Option<String>,
    #[validate(url)]
    pub thumbnail: Option<String>,
    #[serde(default = "active")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateVideo {
    pub product_id: Option<Uuid>,
    #[validate(url)]
    pub video_url: Option<String>,
    #[validate(length(max = 500))]
    pub caption: Option<String>,
    #[validate(url)]
    pub thumbnail: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
pub struct VideoFilter {
    pub product_id: Option<Uuid>,
    pub is_active: Option<bool>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_is_active_by_default() {
        let input: CreateVideo = serde_json::from_value(serde_json::json!({
            "product_id": Uuid::now_v7(),
            "video_url": "https://cdn.example.com/v/1.mp4"
        }))
        .unwrap();

        assert!(input.is_active);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_video_url_must_be_a_url() {
        let input: CreateVideo = serde_json::from_value(serde_json::json!({
            "product_id": Uuid::now_v7(),
            "video_url": "not a url"
        }))
        .unwrap();

        assert!(input.validate().is_err());
    }
}
