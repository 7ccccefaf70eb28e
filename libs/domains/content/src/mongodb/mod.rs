//! MongoDB implementations of the content repositories

mod banners;
mod default_images;
mod videos;

pub use banners::MongoBannerRepository;
pub use default_images::MongoDefaultImageRepository;
pub use videos::MongoVideoRepository;

pub(crate) use database::mongodb::{id_filter, uuid_bson};

use mongodb::bson::doc;
use mongodb::options::FindOptions;

pub(crate) fn page(limit: i64, offset: u64) -> FindOptions {
    FindOptions::builder()
        .limit(limit)
        .skip(offset)
        .sort(doc! { "created_at": -1 })
        .build()
}
