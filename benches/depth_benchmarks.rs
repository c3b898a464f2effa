use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use market_depth_chart::domain::chart::PriceDomain;
use market_depth_chart::domain::market_data::{
    BookUpdate, DepthAggregator, OrderBook, PriceLevel, Symbol,
};
use rust_decimal::Decimal;
use std::hint::black_box;

/// Book with `depth` levels per side, one tick apart around 50 000
fn deep_book(depth: usize) -> OrderBook {
    let level = |i: usize, sign: i64| {
        let price = Decimal::new(5_000_000 + sign * (1 + i as i64), 2);
        let size = Decimal::new(1 + (i as i64 * 7919) % 10_000, 4);
        PriceLevel::new(price, size)
    };
    let bids = (0..depth).map(|i| level(i, -1)).collect();
    let asks = (0..depth).map(|i| level(i, 1)).collect();

    let mut book = OrderBook::new(Symbol::from("BENCH:BTC-USD"));
    if book.replace_snapshot(BookUpdate::new(bids, asks)).is_err() {
        unreachable!("generated levels are positive");
    }
    book
}

fn benchmark_build_curves(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_curves");
    let aggregator = DepthAggregator::new();

    for depth in [100, 1_000, 10_000] {
        let book = deep_book(depth);
        let mid = aggregator.mid_price(&book).unwrap_or(Decimal::ONE);
        let Ok(domain) = PriceDomain::around(mid, Decimal::new(1, 2)) else {
            continue;
        };

        group.bench_with_input(BenchmarkId::from_parameter(depth), &book, |b, book| {
            b.iter(|| black_box(aggregator.build_curves(black_box(book), mid, domain)))
        });
    }
    group.finish();
}

fn benchmark_crosshair_lookup(c: &mut Criterion) {
    let aggregator = DepthAggregator::new();
    let book = deep_book(10_000);
    let mid = aggregator.mid_price(&book).unwrap_or(Decimal::ONE);
    let Ok(domain) = PriceDomain::around(mid, Decimal::new(1, 2)) else {
        return;
    };
    let Ok(curves) = aggregator.build_curves(&book, mid, domain) else {
        return;
    };
    let target = mid - Decimal::new(25_000, 2);

    c.bench_function("held_at_10k", |b| b.iter(|| black_box(curves.bids.held_at(black_box(target)))));
}

criterion_group!(benches, benchmark_build_curves, benchmark_crosshair_lookup);
criterion_main!(benches);
