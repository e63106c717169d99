use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use chrono::Utc;
use rust_decimal::Decimal;
use stowage_core::WarehouseId;
use stowage_inventory::{LocationSize, NewLocation, StorageLocation, find_available, suggest};

/// A warehouse with `count` slots spread over all sizes, roughly a third occupied.
fn warehouse(count: usize) -> (WarehouseId, Vec<StorageLocation>) {
    let warehouse_id = WarehouseId::new();
    let now = Utc::now();
    let locations = (0..count)
        .map(|i| {
            let mut l = StorageLocation::register(
                NewLocation {
                    code: format!("{}{}-{:02}", (b'A' + (i % 26) as u8) as char, i / 26, i % 10),
                    name: None,
                    section: Some(((b'A' + (i % 26) as u8) as char).to_string()),
                    shelf: Some((i / 26).to_string()),
                    cell: Some(format!("{:02}", i % 10)),
                    size: Some(LocationSize::ORDER[i % 4]),
                    daily_rate: Decimal::from(50 + (i * 37) % 200),
                    warehouse_id,
                },
                now,
            )
            .unwrap();
            if i % 3 == 0 {
                l.is_occupied = true;
            }
            l
        })
        .collect();
    (warehouse_id, locations)
}

fn bench_suggest(c: &mut Criterion) {
    let mut group = c.benchmark_group("allocation_suggest");

    for size in [10, 100, 1000, 10_000].iter() {
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("preferred_small", size), size, |b, &n| {
            let (warehouse_id, locations) = warehouse(n);
            let now = Utc::now();
            b.iter(|| {
                black_box(suggest(&locations, warehouse_id, Some(LocationSize::Small), now).unwrap());
            });
        });
        group.bench_with_input(BenchmarkId::new("fallback_any_size", size), size, |b, &n| {
            let (warehouse_id, mut locations) = warehouse(n);
            for l in locations.iter_mut().filter(|l| l.size == LocationSize::ExtraLarge) {
                l.is_occupied = true;
            }
            let now = Utc::now();
            b.iter(|| {
                black_box(suggest(&locations, warehouse_id, Some(LocationSize::ExtraLarge), now).unwrap());
            });
        });
    }

    group.finish();
}

fn bench_find_available(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_available");
    let (warehouse_id, locations) = warehouse(1000);
    let now = Utc::now();

    group.bench_function("all_sizes", |b| {
        b.iter(|| black_box(find_available(&locations, warehouse_id, None, now).len()));
    });
    group.bench_function("medium_only", |b| {
        b.iter(|| black_box(find_available(&locations, warehouse_id, Some(LocationSize::Medium), now).len()));
    });

    group.finish();
}

criterion_group!(benches, bench_suggest, bench_find_available);
criterion_main!(benches);
