use std::sync::Arc;
use std::thread;

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use lazybean::{Amount, Directive, Posting, Transaction, VatConfig};
use rust_decimal::Decimal;

/// `n` tagged purchases with `postings` expense lines each.
fn build_stream(n: usize, postings: usize) -> Vec<Directive> {
    let day = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
    (0..n)
        .map(|i| {
            let mut txn = Transaction::new(day, format!("purchase {i}")).tag("vat");
            let mut total = Decimal::ZERO;
            for p in 0..postings {
                let number = Decimal::new(12_300 + (i * 7 + p * 13) as i64, 2);
                total += number;
                txn = txn.posting(Posting::new(
                    format!("Expenses:Item{p}"),
                    Amount::new(number, "PLN"),
                ));
            }
            txn.posting(Posting::new("Assets:Bank", Amount::new(-total, "PLN")))
                .into()
        })
        .collect()
}

fn bench_split(c: &mut Criterion) {
    let mut group = c.benchmark_group("vat_split");
    let config = VatConfig::default();

    for &postings in &[1, 4, 16] {
        let stream = build_stream(1_000, postings);
        group.bench_function(&format!("1000_txns_{postings}_postings"), |b| {
            b.iter_batched(
                || stream.clone(),
                |stream| lazybean::vat(black_box(stream), &config),
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

fn bench_already_split(c: &mut Criterion) {
    let config = VatConfig::default();
    let once = lazybean::vat(build_stream(1_000, 4), &config).directives;

    c.bench_function("vat_rerun_noop", |b| {
        b.iter_batched(
            || once.clone(),
            |stream| lazybean::vat(black_box(stream), &config),
            BatchSize::LargeInput,
        );
    });
}

fn bench_parallel_chunks(c: &mut Criterion) {
    let config = Arc::new(VatConfig::default());
    let stream = build_stream(8_000, 4);

    let mut group = c.benchmark_group("vat_parallel");
    for &threads in &[1_usize, 2, 4, 8] {
        group.bench_function(&format!("{threads}_threads"), |b| {
            b.iter_batched(
                || {
                    let size = stream.len().div_ceil(threads);
                    stream
                        .chunks(size)
                        .map(<[Directive]>::to_vec)
                        .collect::<Vec<_>>()
                },
                |chunks| {
                    let handles: Vec<_> = chunks
                        .into_iter()
                        .map(|chunk| {
                            let config = Arc::clone(&config);
                            thread::spawn(move || lazybean::vat(chunk, &config))
                        })
                        .collect();
                    handles
                        .into_iter()
                        .map(|h| h.join().unwrap().directives.len())
                        .sum::<usize>()
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_split,
    bench_already_split,
    bench_parallel_chunks
);
criterion_main!(benches);
