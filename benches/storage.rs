// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Benchmarks for version store operations.

use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use eradb::{BitemporalKey, RocksVersionStore, ValueEnvelope, VersionRecord, VersionStore};
use tempfile::TempDir;

fn create_test_store() -> (RocksVersionStore, TempDir) {
    let dir = TempDir::new().unwrap();
    let store = RocksVersionStore::open(dir.path()).unwrap();
    (store, dir)
}

fn record(key: &str, valid_from: u64, tx_id: u64) -> VersionRecord {
    VersionRecord::new(
        BitemporalKey::new(0, key.as_bytes().to_vec(), valid_from, tx_id),
        ValueEnvelope::raw(vec![0u8; 100]),
    )
}

fn bench_append(c: &mut Criterion) {
    let (store, _dir) = create_test_store();

    let mut group = c.benchmark_group("storage");
    group.throughput(Throughput::Elements(1));

    let counter = std::sync::atomic::AtomicU64::new(1);

    group.bench_function("append_one", |b| {
        b.iter(|| {
            let i = counter.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            store
                .append(vec![record(&format!("key{i}"), i * 100, i)])
                .unwrap()
        })
    });

    group.finish();
}

fn bench_append_batch(c: &mut Criterion) {
    let (store, _dir) = create_test_store();

    let mut group = c.benchmark_group("storage");
    group.throughput(Throughput::Elements(100));

    let counter = std::sync::atomic::AtomicU64::new(1);

    group.bench_function("append_batch_100", |b| {
        b.iter(|| {
            let tx_id = counter.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            let records: Vec<_> = (0..100)
                .map(|i| record(&format!("key{}", tx_id * 100 + i), tx_id * 100, tx_id))
                .collect();
            store.append(records).unwrap()
        })
    });

    group.finish();
}

fn bench_get_latest(c: &mut Criterion) {
    let (store, _dir) = create_test_store();

    // 10000 keys, 4 versions each.
    for i in 0..10000u64 {
        for v in 1..=4u64 {
            store
                .append(vec![record(&format!("key{i:05}"), v * 100, i * 4 + v)])
                .unwrap();
        }
    }

    let mut group = c.benchmark_group("storage");
    group.throughput(Throughput::Elements(1));

    group.bench_function("get_latest", |b| {
        b.iter_batched(
            || format!("key{:05}", rand::random::<u32>() % 10000),
            |key| store.get_latest(0, key.as_bytes()).unwrap(),
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

fn bench_scan_versions(c: &mut Criterion) {
    let (store, _dir) = create_test_store();

    // One key with a deep version chain.
    for v in 1..=1000u64 {
        store.append(vec![record("hot", v * 100, v)]).unwrap();
    }

    let mut group = c.benchmark_group("storage");
    group.throughput(Throughput::Elements(1000));

    group.bench_function("scan_versions_1000", |b| {
        b.iter(|| {
            store
                .scan_versions(0, b"hot")
                .unwrap()
                .collect::<Result<Vec<_>, _>>()
                .unwrap()
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_append,
    bench_append_batch,
    bench_get_latest,
    bench_scan_versions,
);
criterion_main!(benches);
