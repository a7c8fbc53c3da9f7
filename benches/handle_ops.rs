use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use uniq_rc::{ActionKind, Shared, SyncShared, Unique};

/// Benchmark: Exclusive handle construction and transfer
///
/// Measures allocation, ownership transfer via `take`, and release for the
/// exclusive owner, which involves no reference counting at all.
fn bench_unique_ops(c: &mut Criterion) {
    let mut group = c.benchmark_group("unique_ops");

    group.bench_function("new_drop", |b| {
        b.iter(|| {
            let owner = Unique::new(black_box(1u64));
            black_box(&owner);
        });
    });

    group.bench_function("take_transfer", |b| {
        b.iter(|| {
            let mut source = Unique::new(black_box(1u64));
            let target = source.take();
            black_box(&target);
        });
    });

    group.bench_function("with_disposer", |b| {
        b.iter(|| {
            let owner = Unique::with_disposer(black_box(1u64), |value| {
                black_box(value);
            });
            black_box(&owner);
        });
    });

    group.finish();
}

/// Benchmark: Clone and drop cost under both count policies
///
/// The unsynchronized policy pays a plain increment; the atomic policy pays
/// the same orderings as `std::sync::Arc`.
fn bench_clone_drop(c: &mut Criterion) {
    let mut group = c.benchmark_group("clone_drop");

    let local: Shared<u64> = Shared::new(1);
    group.bench_function("thread_local", |b| {
        b.iter(|| {
            let cloned = local.clone();
            black_box(&cloned);
        });
    });

    let atomic: SyncShared<u64> = SyncShared::new(1);
    group.bench_function("thread_safe", |b| {
        b.iter(|| {
            let cloned = atomic.clone();
            black_box(&cloned);
        });
    });

    group.finish();
}

/// Benchmark: Observer creation and promotion
fn bench_observe_lock(c: &mut Criterion) {
    let mut group = c.benchmark_group("observe_lock");

    let shared: Shared<u64> = Shared::new(1);
    group.bench_function("observe", |b| {
        b.iter(|| {
            let observer = shared.observe();
            black_box(&observer);
        });
    });

    let observer = shared.observe();
    group.bench_function("lock_alive", |b| {
        b.iter(|| {
            let locked = observer.lock();
            black_box(&locked);
        });
    });

    let expired = {
        let dead: Shared<u64> = Shared::new(2);
        dead.observe()
    };
    group.bench_function("lock_expired", |b| {
        b.iter(|| {
            let locked = expired.lock();
            black_box(&locked);
        });
    });

    group.finish();
}

/// Benchmark: Factory construction cost per variant
fn bench_factory_create(c: &mut Criterion) {
    let mut group = c.benchmark_group("factory_create");

    for kind in ActionKind::ALL.iter() {
        group.bench_with_input(
            BenchmarkId::new("create_perform", format!("{kind:?}")),
            kind,
            |b, &kind| {
                b.iter(|| {
                    let mut action = kind.create();
                    black_box(action.perform());
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_unique_ops,
    bench_clone_drop,
    bench_observe_lock,
    bench_factory_create
);
criterion_main!(benches);
