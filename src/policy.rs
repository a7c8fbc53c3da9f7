use crate::sync::{AtomicUsize, Ordering, fence};
use std::cell::Cell;

/// Upper bound for a reference count. Going past this indicates a
/// `mem::forget` loop rather than a real workload.
///
/// 引用计数的上限。超过它说明存在 `mem::forget` 循环，而不是真实负载。
pub(crate) const MAX_COUNT: usize = isize::MAX as usize;

mod sealed {
    /// 计数策略与计数器的封印特征，外部不可实现。
    pub trait Sealed {}

    impl Sealed for super::ThreadLocal {}
    impl Sealed for super::ThreadSafe {}
    impl Sealed for super::LocalCount {}
    impl Sealed for super::AtomicCount {}
}

/// A strong or weak reference counter inside a control block.
///
/// All count mutation goes through these methods; handles never touch the
/// raw number. The two implementations differ only in synchronization.
/// The trait is sealed: counts move only through the handle operations,
/// never through an implementation outside this crate.
///
/// 控制块内的强引用或弱引用计数器。
///
/// 所有计数变更都经过这些方法，句柄从不直接操作原始数值。
/// 两个实现仅在同步方式上不同。该特征已封印：计数只能经由
/// 句柄操作变更，不存在此 crate 之外的实现。
pub trait RefCount: sealed::Sealed {
    /// A fresh counter holding exactly one reference.
    /// 恰好持有一个引用的新计数器。
    fn one() -> Self;

    /// Current count.
    /// 当前计数。
    fn get(&self) -> usize;

    /// Increment, returning the new count.
    /// 递增，返回新计数。
    fn inc(&self) -> usize;

    /// Increment only if the count is still nonzero.
    ///
    /// Returns `false` once the count has reached zero; a dead count is
    /// never revived. This is the primitive behind `Observer::lock`.
    ///
    /// 仅当计数仍非零时递增。
    ///
    /// 计数一旦归零就返回 `false`，死计数不会复活。
    /// 这是 `Observer::lock` 背后的原语。
    fn try_inc(&self) -> bool;

    /// Decrement, returning the new count.
    /// 递减，返回新计数。
    fn dec(&self) -> usize;

    /// Ordering barrier between observing a zero count and destroying the
    /// data it guarded. A no-op for unsynchronized counts.
    ///
    /// 在观察到计数归零与销毁其保护的数据之间的内存屏障。
    /// 对无同步计数是空操作。
    fn acquire(&self);
}

/// Chooses the counter representation for a family of shared handles.
///
/// The policy is a compile-time switch: `ThreadLocal` for the default
/// unsynchronized counts, `ThreadSafe` for atomic counts. The trait is
/// sealed; these two policies are the only implementations.
///
/// 为一族共享句柄选择计数器表示。
///
/// 策略是编译期开关：默认的无同步计数用 `ThreadLocal`，
/// 原子计数用 `ThreadSafe`。该特征已封印，只有这两个策略实现。
pub trait CountPolicy: sealed::Sealed {
    type Count: RefCount;
}

/// Single-threaded count policy (the default).
///
/// Counts are plain `Cell<usize>` with no synchronization; handles built on
/// this policy are neither `Send` nor `Sync`.
///
/// 单线程计数策略（默认）。
///
/// 计数是普通的 `Cell<usize>`，没有任何同步；
/// 基于此策略的句柄既不是 `Send` 也不是 `Sync`。
#[derive(Debug)]
pub struct ThreadLocal;

/// Atomic count policy for handles that cross threads.
///
/// Uses `AtomicUsize` with the same orderings as `std::sync::Arc`:
/// relaxed increments, release decrements, and an acquire fence before the
/// value is destroyed.
///
/// 用于跨线程句柄的原子计数策略。
///
/// 使用 `AtomicUsize`，内存序与 `std::sync::Arc` 相同：
/// 宽松递增、释放递减，并在销毁值之前加一个获取屏障。
#[derive(Debug)]
pub struct ThreadSafe;

impl CountPolicy for ThreadLocal {
    type Count = LocalCount;
}

impl CountPolicy for ThreadSafe {
    type Count = AtomicCount;
}

/// Unsynchronized counter for the `ThreadLocal` policy.
/// `ThreadLocal` 策略的无同步计数器。
#[derive(Debug)]
pub struct LocalCount(Cell<usize>);

impl RefCount for LocalCount {
    #[inline]
    fn one() -> Self {
        LocalCount(Cell::new(1))
    }

    #[inline]
    fn get(&self) -> usize {
        self.0.get()
    }

    #[inline]
    fn inc(&self) -> usize {
        let new = self.0.get() + 1;
        assert!(new <= MAX_COUNT, "BUG: reference count overflow");
        self.0.set(new);
        new
    }

    #[inline]
    fn try_inc(&self) -> bool {
        if self.0.get() == 0 {
            return false;
        }
        self.inc();
        true
    }

    #[inline]
    fn dec(&self) -> usize {
        let old = self.0.get();
        assert!(old > 0, "BUG: decrement of a zero reference count");
        self.0.set(old - 1);
        old - 1
    }

    #[inline]
    fn acquire(&self) {}
}

/// Atomic counter for the `ThreadSafe` policy.
/// `ThreadSafe` 策略的原子计数器。
#[derive(Debug)]
pub struct AtomicCount(AtomicUsize);

impl RefCount for AtomicCount {
    #[inline]
    fn one() -> Self {
        AtomicCount(AtomicUsize::new(1))
    }

    #[inline]
    fn get(&self) -> usize {
        self.0.load(Ordering::Acquire)
    }

    #[inline]
    fn inc(&self) -> usize {
        // Relaxed is enough: a new reference can only be created from an
        // existing one, which already provides the needed ordering.
        // Relaxed 就够了：新引用只能从既有引用创建，
        // 而既有引用已提供所需的内存序。
        let old = self.0.fetch_add(1, Ordering::Relaxed);
        assert!(old < MAX_COUNT, "BUG: reference count overflow");
        old + 1
    }

    #[inline]
    fn try_inc(&self) -> bool {
        let mut current = self.0.load(Ordering::Relaxed);
        loop {
            if current == 0 {
                return false;
            }
            assert!(current < MAX_COUNT, "BUG: reference count overflow");
            match self.0.compare_exchange_weak(
                current,
                current + 1,
                Ordering::Acquire,
                Ordering::Relaxed,
            ) {
                Ok(_) => return true,
                Err(actual) => current = actual,
            }
        }
    }

    #[inline]
    fn dec(&self) -> usize {
        let old = self.0.fetch_sub(1, Ordering::Release);
        assert!(old > 0, "BUG: decrement of a zero reference count");
        old - 1
    }

    #[inline]
    fn acquire(&self) {
        fence(Ordering::Acquire);
    }
}
