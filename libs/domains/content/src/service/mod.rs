//! Content service

mod banners;
mod default_images;
mod videos;

use std::sync::Arc;
use validator::Validate;

use crate::error::{ContentError, ContentResult};
use crate::repository::{BannerRepository, DefaultImageRepository, VideoRepository};

#[derive(Clone)]
pub struct ContentRepositories {
    pub banners: Arc<dyn BannerRepository>,
    pub default_images: Arc<dyn DefaultImageRepository>,
    pub videos: Arc<dyn VideoRepository>,
}

#[derive(Clone)]
pub struct ContentService {
    banners: Arc<dyn BannerRepository>,
    default_images: Arc<dyn DefaultImageRepository>,
    videos: Arc<dyn VideoRepository>,
}

impl ContentService {
    pub fn new(repos: ContentRepositories) -> Self {
        Self {
            banners: repos.banners,
            default_images: repos.default_images,
            videos: repos.videos,
        }
    }
}

fn validate<T: Validate>(input: &T) -> ContentResult<()> {
    input
        .validate()
        .map_err(|e| ContentError::Validation(e.to_string()))
}
