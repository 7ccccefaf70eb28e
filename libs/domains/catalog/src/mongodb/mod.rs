//! MongoDB implementations of the catalog repositories

mod categories;
mod marks;
mod products;
mod reviews;
mod variants;

pub use categories::MongoCategoryRepository;
pub use marks::MongoMarkRepository;
pub use products::MongoProductRepository;
pub use reviews::MongoReviewRepository;
pub use variants::MongoVariantRepository;

pub(crate) use database::mongodb::{id_filter, uuid_bson};

use mongodb::bson::{Bson, Document, doc, to_bson};
use uuid::Uuid;

/// `{ field: { $in: [ids] } }`
pub(crate) fn in_filter(field: &str, ids: &[Uuid]) -> Document {
    let ids: Vec<Bson> = ids.iter().copied().map(uuid_bson).collect();
    doc! { field: { "$in": ids } }
}

pub(crate) fn now_bson() -> Bson {
    to_bson(&chrono::Utc::now()).unwrap_or(Bson::Null)
}
