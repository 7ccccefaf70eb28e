//! Data access traits for storefront content

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::ContentResult;
use crate::models::{Banner, BannerFilter, DefaultImage, DefaultImageFilter, Video, VideoFilter};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BannerRepository: Send + Sync {
    async fn create(&self, banner: Banner) -> ContentResult<Banner>;

    async fn get_by_id(&self, id: Uuid) -> ContentResult<Option<Banner>>;

    async fn list(&self, filter: BannerFilter) -> ContentResult<Vec<Banner>>;

    async fn update(&self, banner: Banner) -> ContentResult<Banner>;

    async fn delete(&self, id: Uuid) -> ContentResult<bool>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DefaultImageRepository: Send + Sync {
    async fn create(&self, image: DefaultImage) -> ContentResult<DefaultImage>;

    async fn get_by_id(&self, id: Uuid) -> ContentResult<Option<DefaultImage>>;

    async fn list(&self, filter: DefaultImageFilter) -> ContentResult<Vec<DefaultImage>>;

    async fn update(&self, image: DefaultImage) -> ContentResult<DefaultImage>;

    async fn delete(&self, id: Uuid) -> ContentResult<bool>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VideoRepository: Send + Sync {
    async fn create(&self, video: Video) -> ContentResult<Video>;

    async fn get_by_id(&self, id: Uuid) -> ContentResult<Option<Video>>;

    async fn list(&self, filter: VideoFilter) -> ContentResult<Vec<Video>>;

    async fn update(&self, video: Video) -> ContentResult<Video>;

    async fn delete(&self, id: Uuid) -> ContentResult<bool>;
}
