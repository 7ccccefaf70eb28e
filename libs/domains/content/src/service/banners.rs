use tracing::instrument;
use uuid::Uuid;

use super::{ContentService, validate};
use crate::error::{ContentError, ContentResult};
use crate::models::{Banner, BannerFilter, CreateBanner, UpdateBanner};

impl ContentService {
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_banner(&self, input: CreateBanner) -> ContentResult<Banner> {
        validate(&input)?;
        self.banners.create(Banner::new(input)).await
    }

    #[instrument(skip(self))]
    pub async fn get_banner(&self, id: Uuid) -> ContentResult<Banner> {
        self.banners
            .get_by_id(id)
            .await?
            .ok_or(ContentError::BannerNotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn list_banners(&self, filter: BannerFilter) -> ContentResult<Vec<Banner>> {
        self.banners.list(filter).await
    }

    #[instrument(skip(self, input))]
    pub async fn update_banner(&self, id: Uuid, input: UpdateBanner) -> ContentResult<Banner> {
        validate(&input)?;
        let mut banner = self.get_banner(id).await?;
        banner.apply_update(input);
        self.banners.update(banner).await
    }

    /// Delete a banner and hand it back so its image can be removed
    #[instrument(skip(self))]
    pub async fn delete_banner(&self, id: Uuid) -> ContentResult<Banner> {
        let banner = self.get_banner(id).await?;
        if !self.banners.delete(id).await? {
            return Err(ContentError::BannerNotFound(id));
        }
        Ok(banner)
    }
}
