/// 并发测试模块
/// 测试原子计数策略下句柄跨线程的正确性

use crate::{SyncShared, Unique};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

/// 跨线程记录 drop 次数的探针
struct SyncProbe {
    drops: Arc<AtomicUsize>,
}

impl SyncProbe {
    fn new() -> (Self, Arc<AtomicUsize>) {
        let drops = Arc::new(AtomicUsize::new(0));
        (
            SyncProbe {
                drops: Arc::clone(&drops),
            },
            drops,
        )
    }
}

impl Drop for SyncProbe {
    fn drop(&mut self) {
        self.drops.fetch_add(1, Ordering::SeqCst);
    }
}

/// 测试1: 多线程共享读取
#[test]
fn test_clones_read_across_threads() {
    let shared: SyncShared<String> = SyncShared::new(String::from("payload"));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let cloned = shared.clone();
            thread::spawn(move || {
                assert_eq!(&*cloned, "payload");
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(shared.strong_count(), 1);
}

/// 测试2: 多线程克隆与释放后值恰好销毁一次
#[test]
fn test_concurrent_drops_destroy_once() {
    let (probe, drops) = SyncProbe::new();
    let shared: SyncShared<SyncProbe> = SyncShared::new(probe);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let cloned = shared.clone();
            thread::spawn(move || {
                // 线程内再克隆几次，全部在线程退出时释放
                let extra = cloned.clone();
                assert_eq!(extra.drops.load(Ordering::SeqCst), 0);
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(drops.load(Ordering::SeqCst), 0);
    drop(shared);
    assert_eq!(drops.load(Ordering::SeqCst), 1);
}

/// 测试3: 观察者在其他线程提升
#[test]
fn test_observer_locks_from_other_thread() {
    let shared: SyncShared<i32> = SyncShared::new(99);
    let observer = shared.observe();

    let worker = thread::spawn(move || {
        let locked = observer.lock().unwrap();
        *locked
    });

    // 主线程的强句柄保证提升必然成功
    assert_eq!(worker.join().unwrap(), 99);
    assert_eq!(shared.strong_count(), 1);
}

/// 测试4: 所有强句柄在其他线程释放后观察者过期
#[test]
fn test_observer_expires_after_remote_drop() {
    let (probe, drops) = SyncProbe::new();
    let shared: SyncShared<SyncProbe> = SyncShared::new(probe);
    let observer = shared.observe();

    let worker = thread::spawn(move || {
        drop(shared);
    });
    worker.join().unwrap();

    assert_eq!(drops.load(Ordering::SeqCst), 1);
    assert!(observer.expired());
    assert!(observer.lock().is_none());
}

/// 测试5: 通过通道转移句柄
#[test]
fn test_handle_through_channel() {
    let (sender, receiver) = std::sync::mpsc::channel::<SyncShared<Vec<u8>>>();
    let shared: SyncShared<Vec<u8>> = SyncShared::new(vec![1, 2, 3]);

    let worker = thread::spawn(move || {
        let received = receiver.recv().unwrap();
        received.len()
    });

    sender.send(shared.clone()).unwrap();
    assert_eq!(worker.join().unwrap(), 3);
    assert_eq!(shared.strong_count(), 1);
}

/// 测试6: 原子策略下由 Unique 升级并跨线程释放，释放动作恰好执行一次
#[test]
fn test_sync_disposer_runs_once_across_threads() {
    let disposed = Arc::new(AtomicUsize::new(0));
    let recorder = Arc::clone(&disposed);

    let owner = Unique::with_disposer(41u32, move |_| {
        recorder.fetch_add(1, Ordering::SeqCst);
    });
    let shared: SyncShared<u32> = owner.into();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let cloned = shared.clone();
            thread::spawn(move || {
                assert_eq!(*cloned, 41);
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(disposed.load(Ordering::SeqCst), 0);
    drop(shared);
    assert_eq!(disposed.load(Ordering::SeqCst), 1);
}
