//! Benchmarks for the venue-core data-shaping functions

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use serde_json::json;
use std::hint::black_box;
use venue_core::columns::HeaderMap;
use venue_core::employees::{EmployeeDraft, validate_batch};
use venue_core::facilities::{FacilitySet, canonical_label};
use venue_core::hours::{WeeklyHours, parse_time};
use venue_core::pagination::PageWindow;

/// Benchmark opening-hours parsing for both storage shapes
fn bench_hours(c: &mut Criterion) {
    let mut group = c.benchmark_group("hours");

    let restaurant = json!({
        "monday": "09:00 - 22:00",
        "tuesday": "9:00-22:00",
        "wednesday": "closed",
        "thursday": "garbage",
        "friday": "10:00 - 23:30",
        "saturday": "10:00 - 23:30",
        "Sun": "Closed"
    });
    let store = json!([
        {"day": "monday", "closed": false, "slots": [{"open": "08:00", "close": "20:00"}]},
        {"day": "tuesday", "closed": true, "slots": []},
        {"day": "friday", "closed": false, "slots": [{"open": "08:00"}]}
    ]);

    for time in ["09:00", "9:30", "23:59", "24:00", "noon"] {
        group.bench_with_input(BenchmarkId::new("parse_time", time), time, |b, time| {
            b.iter(|| parse_time(black_box(time)));
        });
    }

    group.bench_function("restaurant_round_trip", |b| {
        b.iter(|| WeeklyHours::from_restaurant_value(black_box(&restaurant)).to_restaurant_map());
    });

    group.bench_function("store_round_trip", |b| {
        b.iter(|| WeeklyHours::from_store_value(black_box(&store)).to_store_days());
    });

    group.finish();
}

/// Benchmark facility matching against historical spellings
fn bench_facilities(c: &mut Criterion) {
    let mut group = c.benchmark_group("facilities");

    let stored = vec![
        "wifi",
        "Free WiFi",
        "Car Parking",
        "A/C",
        "Take Out",
        "Rooftop",
        "kids play area",
        "valet",
    ];

    group.throughput(Throughput::Elements(stored.len() as u64));
    group.bench_function("canonical_label", |b| {
        b.iter(|| {
            stored
                .iter()
                .filter_map(|s| canonical_label(black_box(s)))
                .count()
        });
    });

    group.bench_function("from_stored", |b| {
        b.iter(|| FacilitySet::from_stored(black_box(&stored)).labels());
    });

    group.finish();
}

/// Benchmark employee import shaping on a realistic sheet
fn bench_employee_import(c: &mut Criterion) {
    let mut group = c.benchmark_group("employee_import");

    let headers = ["Full Name", "E-mail", "Mobile", "Dept", "Plan ID", "Notes"];
    let drafts: Vec<EmployeeDraft> = (0..500)
        .map(|i| EmployeeDraft {
            name: format!("Employee {i}"),
            email: format!("employee{}@acme.test", i % 480),
            phone: format!("555-{i:04}"),
            department: Some("Sales".to_string()),
            ..EmployeeDraft::default()
        })
        .collect();

    group.bench_function("header_map", |b| {
        b.iter(|| HeaderMap::from_headers(black_box(&headers)));
    });

    group.throughput(Throughput::Elements(drafts.len() as u64));
    group.bench_function("validate_batch", |b| {
        b.iter(|| validate_batch(black_box(&drafts), Some("basic"), 6));
    });

    group.finish();
}

/// Benchmark page-bar arithmetic
fn bench_pagination(c: &mut Criterion) {
    c.bench_function("page_window", |b| {
        b.iter(|| {
            (1..=100)
                .map(|page| PageWindow::new(page, 10, black_box(957)).visible_pages(7).len())
                .sum::<usize>()
        });
    });
}

criterion_group!(
    benches,
    bench_hours,
    bench_facilities,
    bench_employee_import,
    bench_pagination
);

criterion_main!(benches);
