//! Storefront content: banners, default images and product videos

mod banner;
mod default_image;
mod video;

pub use banner::{Banner, BannerFilter, CreateBanner, UpdateBanner};
pub use default_image::{CreateDefaultImage, DefaultImage, DefaultImageFilter, UpdateDefaultImage};
pub use video::{CreateVideo, UpdateVideo, Video, VideoFilter};

pub(crate) fn default_limit() -> i64 {
    50
}
