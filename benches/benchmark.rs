use criterion::{criterion_group, criterion_main, Criterion};

use limit_book_engine::{OrderBook, Side};

/// Builds a non-crossed book `depth` levels deep on each side, with
/// `orders_per_level` resting orders per price. Bids occupy `1..=depth`,
/// asks occupy `depth + 1..=2 * depth`, so placement never crosses and the
/// setup cost isn't itself part of what's measured.
fn setup_order_book(depth: i64, orders_per_level: i32) -> OrderBook {
    let mut ob = OrderBook::new();
    for price in 1..=depth {
        for _ in 0..orders_per_level {
            ob.place_limit(1, price, Side::Buy);
            ob.place_limit(1, price + depth, Side::Sell);
        }
    }
    ob
}

fn bench_match_order(c: &mut Criterion) {
    let depth = 100;
    let orders_per_level = 10;

    c.bench_function("match 1 market order", |b| {
        b.iter_batched(
            || setup_order_book(depth, orders_per_level),
            |mut ob| {
                ob.place_market(depth as i32 * orders_per_level / 2, Side::Buy);
            },
            criterion::BatchSize::SmallInput,
        )
    });

    c.bench_function("match 1 limit crossing order", |b| {
        b.iter_batched(
            || setup_order_book(depth, orders_per_level),
            |mut ob| {
                ob.place_limit(depth as i32 * orders_per_level, depth / 2, Side::Sell);
            },
            criterion::BatchSize::SmallInput,
        )
    });

    c.bench_function("cancel from a deep level", |b| {
        b.iter_batched(
            || {
                let mut ob = setup_order_book(depth, orders_per_level);
                let (id, _) = ob.place_limit(1, depth, Side::Buy);
                (ob, id)
            },
            |(mut ob, id)| {
                ob.cancel_order(id);
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_match_order);
criterion_main!(benches);
