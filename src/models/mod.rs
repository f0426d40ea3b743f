pub mod order;
pub mod wire;

pub use order::{Item, Order, OrderId, OrderTables};
pub use wire::{OrdersPage, OrdersResponse, RawItem, RawOrder};
