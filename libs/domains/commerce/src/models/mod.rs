mod cart;
mod order;
mod return_request;

pub use cart::{Cart, CartFilter, CartItem, CreateCart, UpdateCart};
pub use order::{
    CreateOrder, GeoPoint, Order, OrderFilter, OrderStatus, ShippingAddress, UpdateOrder,
};
pub use return_request::{
    CreateReturn, ReturnEvent, ReturnFilter, ReturnItem, ReturnRequest, ReturnStatus,
    UpdateReturn,
};

pub(crate) fn default_limit() -> i64 {
    50
}
