//! A single-symbol, single-threaded limit order book.
//!
//! Price-time priority matching over two `BTreeMap` price ladders, a dense
//! order index for O(1)-ish cancel/modify lookups, and an append-only trade
//! log. See `book::OrderBook` for the facade.

pub mod book;
pub mod errors;
pub mod index;
pub mod order;
pub mod trade;
pub mod types;

pub use book::OrderBook;
pub use errors::EngineError;
pub use order::Order;
pub use trade::Trade;
pub use types::{Id, Price, Qty, Side, Status, Timestamp};
