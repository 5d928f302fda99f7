use std::time::Duration;

use common::ObjectRef;
use criterion::{Criterion, criterion_group, criterion_main};
use locker::{Locker, MemoryLocker};

fn bench_lock_release_same_key(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let locker = MemoryLocker::new();
    let target = ObjectRef::new("sku", "hot");

    c.bench_function("locker/memory_lock_release_same_key", |b| {
        b.iter(|| {
            rt.block_on(async {
                let mut guard = locker.lock(&target).await.unwrap();
                guard.release().await.unwrap();
            });
        });
    });
}

fn bench_try_lock_uncontended(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let locker = MemoryLocker::new();
    let target = ObjectRef::new("order", "1");

    c.bench_function("locker/memory_try_lock_uncontended", |b| {
        b.iter(|| {
            rt.block_on(async {
                let mut guard = locker
                    .try_lock(&target, Duration::from_millis(100))
                    .await
                    .unwrap();
                guard.release().await.unwrap();
            });
        });
    });
}

fn bench_lock_many_keys(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let locker = MemoryLocker::new();
    let targets: Vec<ObjectRef> = (0..100)
        .map(|i| ObjectRef::new("sku", i.to_string()))
        .collect();

    c.bench_function("locker/memory_lock_100_keys", |b| {
        b.iter(|| {
            rt.block_on(async {
                let mut guards = Vec::with_capacity(targets.len());
                for target in &targets {
                    guards.push(locker.lock(target).await.unwrap());
                }
                for guard in &mut guards {
                    guard.release().await.unwrap();
                }
            });
        });
    });
}

criterion_group!(
    benches,
    bench_lock_release_same_key,
    bench_try_lock_uncontended,
    bench_lock_many_keys
);
criterion_main!(benches);
