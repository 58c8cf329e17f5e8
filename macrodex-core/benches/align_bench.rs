//! Criterion benchmarks for Macrodex hot paths.
//!
//! Benchmarks:
//! 1. Forward-fill lookups over a long daily series
//! 2. Nearest-within-24h display merge
//! 3. Full index history reconstruction

use chrono::{DateTime, Duration, NaiveDate, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use macrodex_core::data::{daily_timeline, forward_fill, merge_for_display};
use macrodex_core::domain::{DailySeries, IntradaySeries};
use macrodex_core::{HistoryConfig, IndexHistoryBuilder, SourceSeries};

// ── Helpers ──────────────────────────────────────────────────────────

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2015, 1, 5).unwrap()
}

fn make_daily(n: usize) -> DailySeries {
    (0..n)
        .map(|i| {
            (
                base_date() + Duration::days(i as i64),
                100.0 + (i as f64 * 0.1).sin() * 10.0,
            )
        })
        .collect()
}

fn make_hourly(n: usize, offset_minutes: i64) -> IntradaySeries {
    let start: DateTime<Utc> = "2024-01-01T00:00:00Z".parse().unwrap();
    (0..n)
        .map(|i| {
            (
                start + Duration::hours(i as i64) + Duration::minutes(offset_minutes),
                50.0 + (i as f64 * 0.05).cos() * 20.0,
            )
        })
        .collect()
}

fn make_sources(days: usize) -> SourceSeries {
    let mut sources = SourceSeries::default();
    for i in (0..days).step_by(7) {
        let date = base_date() + Duration::days(i as i64);
        let phase = i as f64 / 365.0;
        sources
            .fed_balance_sheet
            .insert(date, 7_000.0 + phase.sin() * 500.0);
        sources.treasury_account.insert(date, 700.0 + phase.cos() * 100.0);
        sources.reverse_repo.insert(date, 400.0);
    }
    for i in (0..days).step_by(30) {
        let date = base_date() + Duration::days(i as i64);
        sources.pmi.insert(date, 50.0 + (i as f64 / 90.0).sin() * 4.0);
    }
    sources.price = make_daily(days);
    sources
}

// ── 1. Forward-fill ──────────────────────────────────────────────────

fn bench_forward_fill(c: &mut Criterion) {
    let mut group = c.benchmark_group("forward_fill");

    for &len in &[365, 3_650] {
        let series = make_daily(len);
        let queries = daily_timeline(base_date(), base_date() + Duration::days(len as i64), 1);

        group.bench_with_input(BenchmarkId::new("daily", len), &len, |b, _| {
            b.iter(|| {
                queries
                    .iter()
                    .filter_map(|&q| forward_fill(black_box(&series), q))
                    .sum::<f64>()
            });
        });
    }

    group.finish();
}

// ── 2. Display Merge ─────────────────────────────────────────────────

fn bench_display_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("display_merge");

    for &len in &[1_000, 10_000] {
        let prices = make_hourly(len, 17);
        let index = make_hourly(len / 24, 0);

        group.bench_with_input(BenchmarkId::new("hourly", len), &len, |b, _| {
            b.iter(|| merge_for_display(black_box(&prices), black_box(&index)));
        });
    }

    group.finish();
}

// ── 3. Index History ─────────────────────────────────────────────────

fn bench_index_history(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_history");

    for &days in &[730, 3_650] {
        let sources = make_sources(days);
        let builder = IndexHistoryBuilder::new(&sources, HistoryConfig::default());
        let timeline = daily_timeline(
            base_date() + Duration::days(30),
            base_date() + Duration::days(days as i64),
            7,
        );

        group.bench_with_input(BenchmarkId::new("weekly", days), &days, |b, _| {
            b.iter(|| builder.build(black_box(&timeline)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_forward_fill,
    bench_display_merge,
    bench_index_history,
);
criterion_main!(benches);
