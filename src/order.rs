use crate::types::{Id, Price, Qty, Side, Timestamp};

/// A resting (or just-matched) order.
///
/// `quantity` is the *remaining* quantity — it decreases on partial fills and
/// the order is dropped from its level once it reaches zero.
#[derive(Debug, Clone, Copy)]
pub struct Order {
    pub id: Id,
    pub side: Side,
    pub price: Price,
    pub quantity: Qty,
    pub timestamp: Timestamp,
}
