//! Domain types for barlab

pub mod bar;
pub mod fill;
pub mod order;
pub mod position;

pub use bar::{Bar, BarError};
pub use fill::{FillEvent, TradeRecord};
pub use order::{Execution, Order, OrderId, OrderSide, OrderStatus, RejectReason};
pub use position::Position;
