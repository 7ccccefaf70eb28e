//! MongoDB implementations of the commerce repositories

mod carts;
mod orders;
mod returns;

pub use carts::MongoCartRepository;
pub use orders::MongoOrderRepository;
pub use returns::MongoReturnRepository;

pub(crate) use database::mongodb::{id_filter, uuid_bson};

use mongodb::bson::doc;
use mongodb::options::FindOptions;

/// Newest first, paged
pub(crate) fn page(limit: i64, offset: u64) -> FindOptions {
    FindOptions::builder()
        .limit(limit)
        .skip(offset)
        .sort(doc! { "created_at": -1 })
        .build()
}
