//! Pseudorandom-traffic benchmark harness.
//!
//! Drives the facade with a reproducible stream of limit/market orders at a
//! configurable mix, checking the no-cross invariant periodically and
//! exporting the resulting trade log as CSV.

use std::fs::File;
use std::time::Instant;

use clap::Parser;
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use rand_distr::{Distribution, Uniform};
use serde::{Deserialize, Serialize};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use limit_book_engine::{EngineError, OrderBook, Price, Qty, Side};

/// Parameters for the pseudorandom operation stream, mirroring the
/// original harness's `LoadConfig` field for field.
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "bench-harness")]
#[command(version, about = "Pseudorandom order book load generator")]
pub struct BenchConfig {
    /// How many operations to generate.
    #[arg(long, default_value_t = 1_000_000)]
    pub ops: i64,

    /// Fraction of operations that are limit orders (vs. market).
    #[arg(long, default_value_t = 0.85)]
    pub p_limit: f64,

    /// Fraction of operations that are buys (vs. sells).
    #[arg(long, default_value_t = 0.50)]
    pub p_buy: f64,

    /// Starting mid price, in ticks.
    #[arg(long, default_value_t = 10_000)]
    pub start_mid: i64,

    /// Tick size.
    #[arg(long, default_value_t = 1)]
    pub tick: i64,

    /// Maximum offset (in ticks) of a limit price from the mid, and of the
    /// mid's own periodic random walk.
    #[arg(long, default_value_t = 50)]
    pub max_spread: i64,

    #[arg(long, default_value_t = 1)]
    pub min_qty: Qty,
    #[arg(long, default_value_t = 500)]
    pub max_qty: Qty,

    /// Number of leading operations excluded from progress reporting, to
    /// let the book build up liquidity first.
    #[arg(long, default_value_t = 10_000)]
    pub warmup: i64,

    /// Run the invariant check (and emit a progress log) every N operations.
    /// Zero disables periodic checking.
    #[arg(long, default_value_t = 50_000)]
    pub check_every: i64,

    #[arg(long, default_value_t = 123_456_789)]
    pub seed: u64,

    /// Where to write the trade log as CSV (`Price,Volume,Time`).
    #[arg(long, default_value = "trades.csv")]
    pub out: String,

    /// Load the full config from a JSON file instead of the flags above.
    #[arg(long)]
    #[serde(skip)]
    pub config: Option<String>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            ops: 1_000_000,
            p_limit: 0.85,
            p_buy: 0.50,
            start_mid: 10_000,
            tick: 1,
            max_spread: 50,
            min_qty: 1,
            max_qty: 500,
            warmup: 10_000,
            check_every: 50_000,
            seed: 123_456_789,
            out: "trades.csv".to_string(),
            config: None,
        }
    }
}

impl BenchConfig {
    fn validate(&self) -> Result<(), EngineError> {
        if self.ops <= 0 {
            return Err(EngineError::InvalidConfig("ops must be positive".to_string()));
        }
        if self.min_qty <= 0 || self.max_qty < self.min_qty {
            return Err(EngineError::InvalidConfig(
                "min_qty/max_qty must satisfy 0 < min_qty <= max_qty".to_string(),
            ));
        }
        if self.check_every < 0 {
            return Err(EngineError::InvalidConfig(
                "check_every must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

fn clamp_i64(x: i64, lo: i64, hi: i64) -> i64 {
    x.clamp(lo, hi)
}

/// Panics loudly if the book is crossed, matching the original harness's
/// `std::terminate()` on invariant failure.
fn check_invariants(book: &OrderBook) {
    if let (Some(bid), Some(ask)) = (book.best_bid(), book.best_ask()) {
        assert!(bid <= ask, "invariant violated: crossed book bid={bid} ask={ask}");
    }
}

fn run(cfg: &BenchConfig) -> anyhow::Result<Vec<limit_book_engine::Trade>> {
    cfg.validate()?;

    let mut book = OrderBook::new();
    let mut rng = StdRng::seed_from_u64(cfg.seed);

    let qty_dist =
        Uniform::new_inclusive(cfg.min_qty, cfg.max_qty).map_err(|e| EngineError::InvalidConfig(e.to_string()))?;
    let spread_dist = Uniform::new_inclusive(-cfg.max_spread, cfg.max_spread)
        .map_err(|e| EngineError::InvalidConfig(e.to_string()))?;

    let mut mid: i64 = cfg.start_mid;
    let (mut ok, mut invalid, mut partial, mut empty) = (0i64, 0i64, 0i64, 0i64);

    let t0 = Instant::now();
    for i in 1..=cfg.ops {
        let is_limit = rng.random::<f64>() < cfg.p_limit;
        let is_buy = rng.random::<f64>() < cfg.p_buy;
        let quantity: Qty = qty_dist.sample(&mut rng);
        let side = if is_buy { Side::Buy } else { Side::Sell };

        if i % 1000 == 0 {
            let walk: i64 = spread_dist.sample(&mut rng);
            mid = clamp_i64(mid + walk, 1, i64::MAX / 4);
        }

        let status = if is_limit {
            let offset: i64 = spread_dist.sample(&mut rng);
            let price: Price = clamp_i64(mid + offset, 1, i64::MAX / 4);
            book.place_limit(quantity, price, side).1
        } else {
            book.place_market(quantity, side).1
        };

        use limit_book_engine::Status::*;
        match status {
            Ok => ok += 1,
            InvalidQty | InvalidPrice => invalid += 1,
            PartialFill => partial += 1,
            BookEmpty => empty += 1,
            OrderNotFound | OrderInactive => {}
        }

        if cfg.check_every > 0 && i % cfg.check_every == 0 {
            check_invariants(&book);
            info!(i, cfg.ops, ok, partial, empty, invalid, "progress");
        }
    }

    let elapsed = t0.elapsed().as_secs_f64();
    let ops_per_sec = cfg.ops as f64 / elapsed;
    info!(
        ops = cfg.ops,
        seconds = elapsed,
        ops_per_sec,
        ok,
        partial,
        empty,
        invalid,
        trades = book.trades().len(),
        "done"
    );

    Ok(book.trades().to_vec())
}

fn main() -> anyhow::Result<()> {
    let mut cfg = BenchConfig::parse();
    if let Some(path) = cfg.config.clone() {
        let contents = std::fs::read_to_string(&path)?;
        let loaded: BenchConfig = serde_json::from_str(&contents)?;
        cfg = BenchConfig { config: Some(path), ..loaded };
    }

    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber).expect("failed to install tracing subscriber");

    let trades = run(&cfg)?;

    let file = File::create(&cfg.out)?;
    let mut writer = csv::WriterBuilder::new().from_writer(file);
    writer.write_record(["Price", "Volume", "Time"])?;
    for trade in &trades {
        writer.write_record([
            trade.price.to_string(),
            trade.quantity.to_string(),
            trade.timestamp.to_string(),
        ])?;
    }
    writer.flush()?;

    Ok(())
}
