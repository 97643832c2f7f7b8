mod amount;
mod item;
pub mod wire;

pub use amount::{Price, Quantity};
pub use item::{Item, PurchaseState};
pub use wire::WireItem;
