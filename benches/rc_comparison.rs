use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::rc::Rc;
use std::sync::Arc;
use uniq_rc::{Shared, SyncShared};

/// Benchmark: Clone throughput against the standard library counters
///
/// `Shared<T>` with the unsynchronized policy lines up against `Rc`, and the
/// atomic policy against `Arc`. Any gap beyond noise points at control block
/// layout or ordering choices, not at the counting model itself.
fn bench_clone_vs_std(c: &mut Criterion) {
    let mut group = c.benchmark_group("clone_vs_std");

    let shared: Shared<u64> = Shared::new(1);
    group.bench_function("shared_thread_local", |b| {
        b.iter(|| {
            let cloned = shared.clone();
            black_box(&cloned);
        });
    });

    let rc = Rc::new(1u64);
    group.bench_function("std_rc", |b| {
        b.iter(|| {
            let cloned = Rc::clone(&rc);
            black_box(&cloned);
        });
    });

    let sync_shared: SyncShared<u64> = SyncShared::new(1);
    group.bench_function("shared_thread_safe", |b| {
        b.iter(|| {
            let cloned = sync_shared.clone();
            black_box(&cloned);
        });
    });

    let arc = Arc::new(1u64);
    group.bench_function("std_arc", |b| {
        b.iter(|| {
            let cloned = Arc::clone(&arc);
            black_box(&cloned);
        });
    });

    group.finish();
}

/// Benchmark: Weak promotion against `Weak::upgrade`
fn bench_promotion_vs_std(c: &mut Criterion) {
    let mut group = c.benchmark_group("promotion_vs_std");

    let shared: Shared<u64> = Shared::new(1);
    let observer = shared.observe();
    group.bench_function("observer_lock", |b| {
        b.iter(|| {
            let locked = observer.lock();
            black_box(&locked);
        });
    });

    let rc = Rc::new(1u64);
    let weak = Rc::downgrade(&rc);
    group.bench_function("rc_weak_upgrade", |b| {
        b.iter(|| {
            let upgraded = weak.upgrade();
            black_box(&upgraded);
        });
    });

    let sync_shared: SyncShared<u64> = SyncShared::new(1);
    let sync_observer = sync_shared.observe();
    group.bench_function("sync_observer_lock", |b| {
        b.iter(|| {
            let locked = sync_observer.lock();
            black_box(&locked);
        });
    });

    let arc = Arc::new(1u64);
    let arc_weak = Arc::downgrade(&arc);
    group.bench_function("arc_weak_upgrade", |b| {
        b.iter(|| {
            let upgraded = arc_weak.upgrade();
            black_box(&upgraded);
        });
    });

    group.finish();
}

/// Benchmark: Construct and tear down a counted value of varying payload size
fn bench_alloc_lifecycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("alloc_lifecycle");

    for size in [8usize, 64, 512, 4096].iter() {
        group.bench_with_input(BenchmarkId::new("shared", size), size, |b, &size| {
            b.iter(|| {
                let shared: Shared<Vec<u8>> = Shared::new(vec![0u8; size]);
                black_box(&shared);
            });
        });
        group.bench_with_input(BenchmarkId::new("std_rc", size), size, |b, &size| {
            b.iter(|| {
                let rc = Rc::new(vec![0u8; size]);
                black_box(&rc);
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_clone_vs_std,
    bench_promotion_vs_std,
    bench_alloc_lifecycle
);
criterion_main!(benches);
