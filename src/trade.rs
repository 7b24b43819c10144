use serde::Serialize;

use crate::types::{Id, Price, Qty, Timestamp};

/// A trade represents a matched transaction between two orders.
///
/// - The price comes from the maker's order (i.e. the resting order).
/// - Quantity is the amount filled.
/// - The buyer/seller ids name the two orders crossed, in no particular
///   "taker first" order — either one may have been incoming.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Trade {
    pub buyer_id: Id,
    pub seller_id: Id,
    pub price: Price,
    pub quantity: Qty,
    pub timestamp: Timestamp,
}
