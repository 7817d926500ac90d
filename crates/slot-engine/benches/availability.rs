use chrono::{Duration, NaiveDate, TimeZone, Utc};
use criterion::{criterion_group, criterion_main, Criterion};
use slot_engine::{compute_availability, BusinessHoursConfig, BusyInterval};
use std::hint::black_box;

fn busy_day(count: i64) -> Vec<BusyInterval> {
    let opening = Utc.with_ymd_and_hms(2026, 3, 17, 13, 0, 0).unwrap();
    (0..count)
        .map(|i| {
            let start = opening + Duration::minutes(i * 37 % 540);
            BusyInterval::new(start, start + Duration::minutes(20))
        })
        .collect()
}

fn bench_availability(c: &mut Criterion) {
    let config = BusinessHoursConfig::new(
        "America/Chicago",
        "08:00".parse().unwrap(),
        "17:00".parse().unwrap(),
        15,
    );
    let date = NaiveDate::from_ymd_opt(2026, 3, 17).unwrap();

    let mut group = c.benchmark_group("compute_availability");
    for count in [0, 10, 100] {
        let busy = busy_day(count);
        group.bench_function(format!("{}_busy", count), |b| {
            b.iter(|| compute_availability(black_box(&config), black_box(&busy), black_box(date)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_availability);
criterion_main!(benches);
