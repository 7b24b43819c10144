//! The price ladder, matcher, and public book facade.
//!
//! [`OrderBook`] stores **active** buy and sell orders in two separate
//! [`BTreeMap`]s:
//! - `bids` (buy orders), keyed by price ascending — the best bid is the
//!   greatest key.
//! - `asks` (sell orders), keyed by price ascending — the best ask is the
//!   least key.
//!
//! Each price level (key) has a FIFO queue of orders stored in a
//! [`VecDeque`] to maintain price-time priority.

use std::collections::{BTreeMap, VecDeque};
use std::time::Instant;

use tracing::{info, warn};

use crate::index::{OrderIndex, OrderLocator};
use crate::order::Order;
use crate::trade::Trade;
use crate::types::{Id, Price, Qty, Side, Status, Timestamp};

pub struct OrderBook {
    bids: BTreeMap<Price, VecDeque<Order>>,
    asks: BTreeMap<Price, VecDeque<Order>>,
    index: OrderIndex,
    trades: Vec<Trade>,
    clock_origin: Instant,
}

impl OrderBook {
    /// Creates a new, empty [`OrderBook`], with no active bids or asks.
    pub fn new() -> Self {
        Self {
            bids: BTreeMap::new(),
            asks: BTreeMap::new(),
            index: OrderIndex::new(),
            trades: Vec::new(),
            clock_origin: Instant::now(),
        }
    }

    fn now(&self) -> Timestamp {
        self.clock_origin.elapsed().as_micros() as Timestamp
    }

    fn ladder(&self, side: Side) -> &BTreeMap<Price, VecDeque<Order>> {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }

    fn ladder_mut(&mut self, side: Side) -> &mut BTreeMap<Price, VecDeque<Order>> {
        match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        }
    }

    /// Adds a **limit** order to the book (buy or sell), then runs the
    /// matcher against the incoming side. Returns the newly allocated id
    /// alongside the matcher's status.
    ///
    /// Preconditions (checked in this order, matching `original_source`'s
    /// `placeLimit`): `price > 0` else `InvalidPrice`, `quantity > 0` else
    /// `InvalidQty`. No id is allocated when a precondition fails — the
    /// returned id is `-1` in that case.
    pub fn place_limit(&mut self, quantity: Qty, price: Price, side: Side) -> (Id, Status) {
        if price <= 0 {
            return (-1, Status::InvalidPrice);
        }
        if quantity <= 0 {
            return (-1, Status::InvalidQty);
        }

        let ts = self.now();
        let id = self.index.push(OrderLocator {
            side,
            price,
            active: true,
        });
        self.ladder_mut(side).entry(price).or_default().push_back(Order {
            id,
            side,
            price,
            quantity,
            timestamp: ts,
        });

        info!(id, ?side, price, quantity, "limit order resting");
        let status = self.match_limit(side);
        (id, status)
    }

    /// Submits a **market** order: it never rests, consuming opposite-side
    /// liquidity from the best price outward until exhausted or the
    /// incoming quantity is filled.
    pub fn place_market(&mut self, quantity: Qty, side: Side) -> (Id, Status) {
        if quantity <= 0 {
            return (-1, Status::InvalidQty);
        }

        let id = self.index.push(OrderLocator {
            side,
            price: 0,
            active: false,
        });
        info!(id, ?side, quantity, "market order submitted");
        let status = self.drain_market(id, side, quantity);
        (id, status)
    }

    /// The crossing loop run after every limit placement. Consumes
    /// resting liquidity on both sides while the top-of-book prices cross,
    /// giving the resting (maker) side its quoted price. Any leftover
    /// quantity on the incoming side simply continues resting in its own
    /// level — this always reports `Ok`, since there is nothing more
    /// informative to report to a limit placer than "the book is
    /// consistent now".
    fn match_limit(&mut self, incoming_side: Side) -> Status {
        loop {
            let (Some(&pb), Some(&ps)) = (self.bids.keys().next_back(), self.asks.keys().next())
            else {
                return Status::Ok;
            };
            if pb < ps {
                return Status::Ok;
            }

            let traded = self.cross_one(pb, ps, incoming_side);
            debug_assert!(traded > 0, "matcher must make progress each iteration");
        }
    }

    /// Drains the opposite ladder for a market order. Returns `BookEmpty`
    /// if the opposite side had no liquidity at all; `PartialFill` if the
    /// ladder emptied before `quantity` was exhausted; `Ok` otherwise.
    fn drain_market(&mut self, incoming_id: Id, side: Side, mut quantity: Qty) -> Status {
        let opposite = side.opposite();
        if self.ladder(opposite).is_empty() {
            return Status::BookEmpty;
        }

        // One timestamp for the whole call: every trade this market order
        // generates, however many levels it crosses, shares it.
        let ts = self.now();

        while quantity > 0 {
            let Some(&price) = (match opposite {
                Side::Buy => self.bids.keys().next_back(),
                Side::Sell => self.asks.keys().next(),
            }) else {
                break;
            };

            let opposite_ladder = match opposite {
                Side::Buy => &mut self.bids,
                Side::Sell => &mut self.asks,
            };
            let level = opposite_ladder
                .get_mut(&price)
                .expect("price level present for its own key");
            let maker = level.front_mut().expect("levels are never left empty");
            let traded = quantity.min(maker.quantity);
            let maker_id = maker.id;

            maker.quantity -= traded;
            quantity -= traded;
            let maker_filled = maker.quantity == 0;
            if maker_filled {
                level.pop_front();
            }
            let level_emptied = level.is_empty();
            if level_emptied {
                opposite_ladder.remove(&price);
            }

            let (buyer_id, seller_id) = match side {
                Side::Buy => (incoming_id, maker_id),
                Side::Sell => (maker_id, incoming_id),
            };
            self.trades.push(Trade {
                buyer_id,
                seller_id,
                price,
                quantity: traded,
                timestamp: ts,
            });
            if maker_filled {
                self.index.retire(maker_id);
            }
            if level_emptied {
                warn!(price, side = ?opposite, "level emptied, removing");
            }
        }

        if quantity > 0 {
            Status::PartialFill
        } else {
            Status::Ok
        }
    }

    /// Matches exactly one pair of top-of-book orders (one buy, one sell)
    /// and returns the traded quantity. Callers must have already verified
    /// `pb >= ps`.
    fn cross_one(&mut self, pb: Price, ps: Price, incoming_side: Side) -> Qty {
        let price = match incoming_side {
            Side::Buy => ps,
            Side::Sell => pb,
        };
        let ts = self.now();

        let buyer = self
            .bids
            .get_mut(&pb)
            .and_then(VecDeque::front_mut)
            .expect("bid level non-empty");
        let seller_qty = self.asks.get(&ps).and_then(VecDeque::front).expect("ask level non-empty").quantity;
        let traded = buyer.quantity.min(seller_qty);
        buyer.quantity -= traded;
        let buyer_id = buyer.id;
        let buyer_remaining = buyer.quantity;

        let seller = self
            .asks
            .get_mut(&ps)
            .and_then(VecDeque::front_mut)
            .expect("ask level non-empty");
        seller.quantity -= traded;
        let seller_id = seller.id;
        let seller_remaining = seller.quantity;

        self.trades.push(Trade {
            buyer_id,
            seller_id,
            price,
            quantity: traded,
            timestamp: ts,
        });

        if buyer_remaining == 0 {
            self.index.retire(buyer_id);
            self.bids.get_mut(&pb).unwrap().pop_front();
        }
        if seller_remaining == 0 {
            self.index.retire(seller_id);
            self.asks.get_mut(&ps).unwrap().pop_front();
        }

        if self.bids.get(&pb).is_some_and(VecDeque::is_empty) {
            warn!(price = pb, side = ?Side::Buy, "level emptied, removing");
            self.bids.remove(&pb);
        }
        if self.asks.get(&ps).is_some_and(VecDeque::is_empty) {
            warn!(price = ps, side = ?Side::Sell, "level emptied, removing");
            self.asks.remove(&ps);
        }

        traded
    }

    /// Cancels a resting order in O(level depth). `OrderNotFound` if `id`
    /// was never issued; `OrderInactive` if it was already cancelled or
    /// fully filled.
    pub fn cancel_order(&mut self, id: Id) -> Status {
        let Some(locator) = self.index.get(id).copied() else {
            return Status::OrderNotFound;
        };
        if !locator.active {
            return Status::OrderInactive;
        }

        let level = self
            .ladder_mut(locator.side)
            .get_mut(&locator.price)
            .expect("active locator must point at a live level");
        let pos = level
            .iter()
            .position(|o| o.id == id)
            .expect("active locator must point at a live order");
        level.remove(pos);

        if level.is_empty() {
            self.ladder_mut(locator.side).remove(&locator.price);
        }
        self.index.retire(id);
        Status::Ok
    }

    /// `cancelOrder(id)` followed, on success, by `placeLimit(newQty,
    /// newPrice, side)`. The replacement gets a fresh id and loses time
    /// priority — see the Open Questions in SPEC_FULL.md if you need
    /// in-place quantity reduction instead.
    pub fn modify_order(&mut self, id: Id, new_quantity: Qty, new_price: Price) -> (Id, Status) {
        let Some(side) = self.index.get(id).map(|l| l.side) else {
            return (-1, Status::OrderNotFound);
        };
        let status = self.cancel_order(id);
        if status != Status::Ok {
            return (-1, status);
        }
        self.place_limit(new_quantity, new_price, side)
    }

    pub fn best_bid(&self) -> Option<Price> {
        self.bids.keys().next_back().copied()
    }

    pub fn best_ask(&self) -> Option<Price> {
        self.asks.keys().next().copied()
    }

    pub fn spread(&self) -> Option<Price> {
        Some(self.best_ask()? - self.best_bid()?)
    }

    /// Sums `quantity_remaining` across both sides at `price`. In a
    /// non-crossed book at most one side ever has resting quantity at any
    /// given price, so this asymmetric-sounding aggregation is benign —
    /// kept as named in the source rather than split into `bid_volume`/
    /// `ask_volume`.
    pub fn volume(&self, price: Price) -> Qty {
        let buy: Qty = self
            .bids
            .get(&price)
            .map(|level| level.iter().map(|o| o.quantity).sum())
            .unwrap_or(0);
        let sell: Qty = self
            .asks
            .get(&price)
            .map(|level| level.iter().map(|o| o.quantity).sum())
            .unwrap_or(0);
        buy + sell
    }

    /// Total resting quantity per side, `(buy, sell)`.
    pub fn size(&self) -> (Qty, Qty) {
        let buy = self.bids.values().flatten().map(|o| o.quantity).sum();
        let sell = self.asks.values().flatten().map(|o| o.quantity).sum();
        (buy, sell)
    }

    /// Count of resting orders per side, `(buy, sell)`, counted directly
    /// from the ladders rather than derived from the id counter.
    pub fn num_orders(&self) -> (i64, i64) {
        let buy = self.bids.values().map(VecDeque::len).sum::<usize>() as i64;
        let sell = self.asks.values().map(VecDeque::len).sum::<usize>() as i64;
        (buy, sell)
    }

    /// All resting orders, buys followed by sells, each side traversed
    /// price-ascending.
    pub fn snapshot(&self) -> Vec<Order> {
        let mut book = Vec::with_capacity(self.index.len());
        book.extend(self.bids.values().flatten().copied());
        book.extend(self.asks.values().flatten().copied());
        book
    }

    /// The full trade log, in emission order.
    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    /// Resets ladders, index, trade log, and the id counter to their
    /// initial empty state.
    pub fn clear(&mut self) {
        self.bids.clear();
        self.asks.clear();
        self.index.clear();
        self.trades.clear();
    }
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new()
    }
}
