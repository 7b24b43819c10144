//! The dense, append-only order index: id -> locator.
//!
//! Mirrors `orderIDs: vector<Pointer>` from the original C++ `limitBook.hpp`.
//! Ids are issued by a monotone counter starting at 0, so a plain `Vec`
//! indexed by id is optimal — no hashing, no sparse map.

use crate::types::{Id, Price, Side};

/// Locates a (possibly already-retired) order within the ladder.
///
/// While `active`, `(side, price)` names the level the order lives in; the
/// order itself is found within that level by a scan for `id` (see
/// `OrderBook::cancel_order`). Once retired, `active` is `false` forever —
/// ids are never reused and a retired locator's fields must not be trusted.
#[derive(Debug, Clone, Copy)]
pub struct OrderLocator {
    pub side: Side,
    pub price: Price,
    pub active: bool,
}

/// Dense, append-only map from order id to its locator.
#[derive(Debug, Default)]
pub struct OrderIndex {
    locators: Vec<OrderLocator>,
}

impl OrderIndex {
    pub fn new() -> Self {
        Self {
            locators: Vec::new(),
        }
    }

    /// Registers a fresh id, returning it. Ids are assigned by position, so
    /// this must be called exactly once per issued id, in order.
    pub fn push(&mut self, locator: OrderLocator) -> Id {
        self.locators.push(locator);
        (self.locators.len() - 1) as Id
    }

    /// `None` if `id` has never been issued.
    pub fn get(&self, id: Id) -> Option<&OrderLocator> {
        if id < 0 {
            return None;
        }
        self.locators.get(id as usize)
    }

    /// Marks `id`'s locator inactive. Centralizing every such write here
    /// avoids the index/ladder divergence bug class: nothing outside this
    /// module flips `active` directly.
    pub fn retire(&mut self, id: Id) {
        if let Some(loc) = self.locators.get_mut(id as usize) {
            loc.active = false;
        }
    }

    pub fn len(&self) -> usize {
        self.locators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locators.is_empty()
    }

    pub fn clear(&mut self) {
        self.locators.clear();
    }
}
