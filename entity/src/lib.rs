pub mod order;
pub mod order_item;
pub mod perfume;
pub mod user;
