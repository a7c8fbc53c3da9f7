use crate::block::{Block, DisposeFn};
use crate::error::AllocError;
use crate::observer::Observer;
use crate::policy::{CountPolicy, RefCount, ThreadLocal, ThreadSafe};
use crate::unique::Unique;
use std::fmt;
use std::marker::PhantomData;
use std::mem::ManuallyDrop;
use std::ops::Deref;
use std::ptr::NonNull;

/// Thread-safe shared owner (atomic counts, `Send + Sync` handles).
/// 线程安全的共享所有者（原子计数，句柄为 `Send + Sync`）。
pub type SyncShared<T> = Shared<T, ThreadSafe>;

/// A reference-counted shared owner of a heap value.
///
/// Cloning a `Shared` never duplicates the value; it only adds a strong
/// reference to the same control block, so all clones observe the same
/// state. The value is destroyed exactly once, at the moment the strong
/// count transitions from one to zero. Construction allocates the value and
/// its control block in a single step, so the value never exists without its
/// bookkeeping.
///
/// **Weak observation**: [`observe`](Shared::observe) hands out an
/// [`Observer`] that watches the value without keeping it alive — the tool
/// for back-references that must not extend a lifetime (a cycle of strong
/// references leaks both sides permanently, since neither count can reach
/// zero).
///
/// **Upgrading exclusive ownership**: a `Shared` can be built
/// [`From`] a [`Unique`], taking over sole ownership (and any attached
/// disposer) under a fresh control block. The reverse conversion does not
/// exist; it would leave ownership ambiguous.
///
/// The second type parameter selects the count policy; the default
/// [`ThreadLocal`] is unsynchronized and single-threaded, while
/// [`SyncShared`] uses atomic counts.
///
/// ```
/// use uniq_rc::Shared;
///
/// let a: Shared<Vec<i32>> = Shared::new(vec![1, 2, 3]);
/// let b = a.clone();
/// assert_eq!(a.strong_count(), 2);
/// assert!(a.ptr_eq(&b));
/// drop(a);
/// assert_eq!(b.strong_count(), 1);
/// ```
///
/// 堆值的引用计数共享所有者。
///
/// 克隆 `Shared` 从不复制值，只会向同一控制块添加一个强引用，
/// 因此所有克隆观察到同一份状态。值恰好被销毁一次，时机是强计数
/// 从一变为零的那一刻。构造在单一步骤内分配值与其控制块，
/// 值永远不会脱离簿记而存在。
///
/// **弱观察**：[`observe`](Shared::observe) 给出一个 [`Observer`]，
/// 它观察值而不维持其存活——用于不应延长生命周期的反向引用
/// （强引用环会让两侧永久泄漏，因为双方的计数都无法归零）。
///
/// **升级独占所有权**：`Shared` 可以 [`From`] 一个 [`Unique`] 构建，
/// 在新控制块下接管独占所有权（及附加的释放动作）。反向转换不存在，
/// 否则所有权归属会变得含糊。
///
/// 第二个类型参数选择计数策略；默认的 [`ThreadLocal`] 无同步、
/// 仅限单线程，[`SyncShared`] 则使用原子计数。
pub struct Shared<T, P: CountPolicy = ThreadLocal> {
    pub(crate) block: NonNull<Block<T, P>>,
    pub(crate) _marker: PhantomData<Block<T, P>>,
}

// Handles are !Send/!Sync by default (raw pointer). Only the atomic policy
// may cross threads, under the same bounds as `std::sync::Arc`.
// 句柄默认 !Send/!Sync（裸指针）。只有原子策略可以跨线程，
// 约束与 `std::sync::Arc` 相同。
unsafe impl<T: Send + Sync> Send for Shared<T, ThreadSafe> {}
unsafe impl<T: Send + Sync> Sync for Shared<T, ThreadSafe> {}

impl<T, P: CountPolicy> Shared<T, P> {
    /// Allocate `value` and a fresh control block in one step, with a strong
    /// count of one.
    ///
    /// 在单一步骤内分配 `value` 与新控制块，强计数为一。
    #[inline]
    pub fn new(value: T) -> Self {
        Self::from_block(Block::new(value, None))
    }

    /// Like [`new`](Shared::new), but reports allocation failure instead of
    /// aborting. On failure `value` is dropped; nothing is left partially
    /// constructed.
    ///
    /// 与 [`new`](Shared::new) 相同，但分配失败时报告错误而不是中止。
    /// 失败时 `value` 被丢弃，不会留下半构造的状态。
    pub fn try_new(value: T) -> Result<Self, AllocError> {
        Block::try_alloc(value, None).map(|block| Shared {
            block,
            _marker: PhantomData,
        })
    }

    pub(crate) fn from_block(block: Block<T, P>) -> Self {
        Shared {
            block: NonNull::from(Box::leak(Box::new(block))),
            _marker: PhantomData,
        }
    }

    #[inline]
    fn strong(&self) -> &P::Count {
        // Field-level access only; a reference to the whole block would
        // alias the disposal path's mutation of other fields.
        // 仅做字段级访问；对整个控制块取引用会与释放路径上
        // 其他字段的修改产生别名冲突。
        unsafe { &(*self.block.as_ptr()).strong }
    }

    #[inline]
    fn weak(&self) -> &P::Count {
        unsafe { &(*self.block.as_ptr()).weak }
    }

    /// Number of live strong handles sharing this value.
    /// 共享此值的存活强句柄数量。
    #[inline]
    pub fn strong_count(&self) -> usize {
        self.strong().get()
    }

    /// Number of live observers watching this value.
    /// 观察此值的存活观察者数量。
    #[inline]
    pub fn weak_count(&self) -> usize {
        // All strong handles collectively hold one weak reference;
        // subtract it to report observers only.
        // 所有强句柄共同持有一个弱引用；减掉它，只报告观察者。
        self.weak().get() - 1
    }

    /// Create a non-owning observer of this value.
    ///
    /// The observer does not keep the value alive; it must be promoted via
    /// [`Observer::lock`] before any access.
    ///
    /// 创建此值的非拥有观察者。
    ///
    /// 观察者不维持值的存活；任何访问之前必须先通过
    /// [`Observer::lock`] 提升。
    pub fn observe(&self) -> Observer<T, P> {
        self.weak().inc();
        Observer {
            block: self.block,
            _marker: PhantomData,
        }
    }

    /// Exclusive access to the value, granted only when this is the sole
    /// strong handle and no observer exists.
    ///
    /// 仅当这是唯一的强句柄且不存在观察者时，授予对值的独占访问。
    pub fn try_unique(&mut self) -> Option<&mut T> {
        if self.strong().get() == 1 && self.weak().get() == 1 {
            // SAFETY: the counts prove no other handle can reach the value,
            // and `&mut self` pins this one for the borrow's duration.
            // SAFETY: 计数证明没有其他句柄能触及该值，
            // 且 `&mut self` 在借用期间钉住了当前句柄。
            Some(unsafe { &mut *(*self.block.as_ptr()).value })
        } else {
            None
        }
    }

    /// True iff both handles share one control block.
    /// 当且仅当两个句柄共享同一控制块时为真。
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.block.as_ptr(), other.block.as_ptr())
    }
}

impl<T: 'static, P: CountPolicy> From<Unique<T>> for Shared<T, P> {
    /// Upgrade exclusive ownership to shared ownership.
    ///
    /// The value and any attached disposer move under a fresh control block
    /// with a strong count of one. The disposer still runs exactly once,
    /// when the last strong handle releases.
    ///
    /// # Panics
    /// Panics if the `Unique` handle is empty.
    ///
    /// 将独占所有权升级为共享所有权。
    ///
    /// 值与附加的释放动作移入强计数为一的新控制块。释放动作仍然
    /// 恰好执行一次，时机是最后一个强句柄释放时。
    ///
    /// # Panics
    /// `Unique` 句柄为空时 panic。
    fn from(mut owner: Unique<T>) -> Self {
        let value = owner
            .value
            .take()
            .expect("cannot share an empty Unique handle");
        let dispose = owner.dispose.take().map(|dispose| -> DisposeFn<T> {
            // The exclusive disposer receives a box; re-box on the way out.
            // 独占释放动作接收箱体；释放时重新装箱。
            Box::new(move |value: T| dispose(Box::new(value)))
        });
        Self::from_block(Block::new(*value, dispose))
    }
}

impl<T, P: CountPolicy> Clone for Shared<T, P> {
    /// Add one strong reference; the value itself is never duplicated.
    /// 增加一个强引用；值本身从不被复制。
    #[inline]
    fn clone(&self) -> Self {
        self.strong().inc();
        Shared {
            block: self.block,
            _marker: PhantomData,
        }
    }
}

impl<T, P: CountPolicy> Drop for Shared<T, P> {
    fn drop(&mut self) {
        let block = self.block.as_ptr();
        unsafe {
            if (*block).strong.dec() != 0 {
                return;
            }
            // Last strong handle: dispose the value in place, then release
            // the weak reference held collectively by the strong handles.
            // 最后一个强句柄：就地释放值，然后归还全体强句柄
            // 共同持有的那个弱引用。
            (*block).strong.acquire();
            match (*block).dispose.take() {
                Some(dispose) => dispose(ManuallyDrop::take(&mut (*block).value)),
                None => ManuallyDrop::drop(&mut (*block).value),
            }
            if (*block).weak.dec() == 0 {
                (*block).weak.acquire();
                drop(Box::from_raw(block));
            }
        }
    }
}

impl<T, P: CountPolicy> Deref for Shared<T, P> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        // SAFETY: a live Shared implies strong > 0, so the value is alive.
        // SAFETY: 存活的 Shared 意味着强计数 > 0，值一定存活。
        unsafe { &*(*self.block.as_ptr()).value }
    }
}

impl<T: fmt::Debug, P: CountPolicy> fmt::Debug for Shared<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}
