//! FILENAME: core/rollup-engine/benches/rollup_calculations.rs
//! Rollup throughput over a server-sized row window.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rollup_engine::{rollup, Bucket, MeasureSpec, SeriesSpec, SourceRow};
use serde_json::json;

fn synth_rows(count: usize) -> Vec<SourceRow> {
    (0..count)
        .map(|i| {
            let day = 1 + (i % 28);
            let month = 1 + (i / 28) % 12;
            match json!({
                "created_at": format!("2024-{month:02}-{day:02} {:02}:00:00", i % 24),
                "order_id": format!("ord-{}", i / 3),
                "quantity": (i % 7) as f64,
                "line_total": (i % 50) as f64 * 1.3,
            }) {
                serde_json::Value::Object(map) => map,
                _ => unreachable!(),
            }
        })
        .collect()
}

fn bench_rollup(c: &mut Criterion) {
    let spec = SeriesSpec::new(
        "created_at",
        vec![
            MeasureSpec::sum("units", "quantity"),
            MeasureSpec::sum("revenue", "line_total"),
            MeasureSpec::distinct("orders", "order_id"),
        ],
    );
    let rows = synth_rows(10_000);

    for bucket in [Bucket::Day, Bucket::Week, Bucket::Month] {
        c.bench_function(&format!("rollup_10k_{bucket}"), |b| {
            b.iter(|| rollup(black_box(&rows), bucket, black_box(&spec)))
        });
    }
}

criterion_group!(benches, bench_rollup);
criterion_main!(benches);
