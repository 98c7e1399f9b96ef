use std::hint::black_box;

use chrono::NaiveDate;
use criterion::{criterion_group, criterion_main, Criterion};
use holiday_engine::jurisdictions::united_states;
use holiday_engine::{CalendarStore, DateWindow};

fn window(y0: i32, y1: i32) -> DateWindow {
    DateWindow::new(
        NaiveDate::from_ymd_opt(y0, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(y1, 12, 31).unwrap(),
    )
    .unwrap()
}

fn bench_generate(c: &mut Criterion) {
    let us = united_states();
    let mut group = c.benchmark_group("us_generate");
    for (label, w) in [("1y", window(2023, 2023)), ("27y", window(2000, 2026))] {
        group.bench_function(label, |b| b.iter(|| us.generate(black_box(&w)).unwrap()));
    }
    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let store = CalendarStore::with_window(window(2000, 2026));
    store.holiday_set("US").unwrap();
    let date = NaiveDate::from_ymd_opt(2015, 7, 3).unwrap();
    c.bench_function("us_is_holiday", |b| {
        b.iter(|| store.is_holiday("US", black_box(date)).unwrap())
    });
}

criterion_group!(benches, bench_generate, bench_lookup);
criterion_main!(benches);
