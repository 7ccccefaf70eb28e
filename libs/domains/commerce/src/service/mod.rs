//! Commerce services, one per repository

mod carts;
mod orders;
mod returns;

pub use carts::CartService;
pub use orders::OrderService;
pub use returns::ReturnService;

use validator::Validate;

use crate::error::{CommerceError, CommerceResult};

fn validate<T: Validate>(input: &T) -> CommerceResult<()> {
    input
        .validate()
        .map_err(|e| CommerceError::Validation(e.to_string()))
}
