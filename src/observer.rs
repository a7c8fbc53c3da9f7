use crate::block::Block;
use crate::policy::{CountPolicy, RefCount, ThreadLocal, ThreadSafe};
use crate::shared::Shared;
use std::fmt;
use std::marker::PhantomData;
use std::ptr::NonNull;

/// Thread-safe observer (atomic counts, `Send + Sync` handles).
/// 线程安全的观察者（原子计数，句柄为 `Send + Sync`）。
pub type SyncObserver<T> = Observer<T, ThreadSafe>;

/// A non-owning observer of a [`Shared`] value.
///
/// An `Observer` holds a weak reference into the value's control block: it
/// never keeps the value alive, and it provides no direct access to it.
/// The only path to the value is [`lock`](Observer::lock), which promotes
/// the observer to a temporary strong handle — or reports, via `None`, that
/// the value has already been destroyed.
///
/// This is the tool for bidirectional relations where one direction must
/// not extend the owned object's lifetime: hold the forward link as a
/// [`Shared`] and the back link as an `Observer`, and the pair remains
/// destructible. Two strong links would form a cycle that leaks both sides.
///
/// Dropping an observer detaches it from the control block without
/// affecting the value or its strong count.
///
/// ```
/// use uniq_rc::Shared;
///
/// let owner: Shared<i32> = Shared::new(5);
/// let observer = owner.observe();
/// assert!(!observer.expired());
/// {
///     let locked = observer.lock().expect("value still alive");
///     assert_eq!(*locked, 5);
///     assert_eq!(locked.strong_count(), 2);
/// }
/// drop(owner);
/// assert!(observer.expired());
/// assert!(observer.lock().is_none());
/// ```
///
/// [`Shared`] 值的非拥有观察者。
///
/// `Observer` 持有指向值控制块的弱引用：它从不维持值的存活，
/// 也不提供对值的直接访问。通往值的唯一路径是
/// [`lock`](Observer::lock)，它将观察者提升为临时强句柄——
/// 或者通过 `None` 报告值已被销毁。
///
/// 这是处理"某个方向不得延长对象生命周期"的双向关系的工具：
/// 前向链接持有 [`Shared`]，反向链接持有 `Observer`，整对对象
/// 保持可销毁。两条强链接会形成环，使两侧都泄漏。
///
/// 丢弃观察者只是将其从控制块分离，不影响值及其强计数。
pub struct Observer<T, P: CountPolicy = ThreadLocal> {
    pub(crate) block: NonNull<Block<T, P>>,
    pub(crate) _marker: PhantomData<Block<T, P>>,
}

unsafe impl<T: Send + Sync> Send for Observer<T, ThreadSafe> {}
unsafe impl<T: Send + Sync> Sync for Observer<T, ThreadSafe> {}

impl<T, P: CountPolicy> Observer<T, P> {
    #[inline]
    fn strong(&self) -> &P::Count {
        unsafe { &(*self.block.as_ptr()).strong }
    }

    #[inline]
    fn weak(&self) -> &P::Count {
        unsafe { &(*self.block.as_ptr()).weak }
    }

    /// True iff the observed value has already been destroyed.
    /// 当且仅当被观察的值已被销毁时为真。
    #[inline]
    pub fn expired(&self) -> bool {
        self.strong().get() == 0
    }

    /// Promote to a temporary strong handle, if the value is still alive.
    ///
    /// On success the strong count is incremented and the returned handle
    /// keeps the value alive until it is dropped. Once the value has been
    /// destroyed, `lock` returns `None`; a dead value is never revived.
    ///
    /// 若值仍然存活，提升为临时强句柄。
    ///
    /// 成功时强计数递增，返回的句柄在被丢弃前维持值的存活。
    /// 值一旦被销毁，`lock` 返回 `None`；死值绝不复活。
    pub fn lock(&self) -> Option<Shared<T, P>> {
        if self.strong().try_inc() {
            Some(Shared {
                block: self.block,
                _marker: PhantomData,
            })
        } else {
            None
        }
    }

    /// Number of strong handles currently keeping the value alive.
    /// 当前维持值存活的强句柄数量。
    #[inline]
    pub fn strong_count(&self) -> usize {
        self.strong().get()
    }

    /// True iff both observers watch one control block.
    /// 当且仅当两个观察者注视同一控制块时为真。
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.block.as_ptr(), other.block.as_ptr())
    }
}

impl<T, P: CountPolicy> Clone for Observer<T, P> {
    /// Add one weak reference to the same control block.
    /// 向同一控制块增加一个弱引用。
    #[inline]
    fn clone(&self) -> Self {
        self.weak().inc();
        Observer {
            block: self.block,
            _marker: PhantomData,
        }
    }
}

impl<T, P: CountPolicy> Drop for Observer<T, P> {
    fn drop(&mut self) {
        let block = self.block.as_ptr();
        unsafe {
            if (*block).weak.dec() == 0 {
                // No handle of any kind remains; the value is long gone,
                // only the block itself is left to free.
                // 不再有任何句柄；值早已销毁，只剩控制块本身待释放。
                (*block).weak.acquire();
                drop(Box::from_raw(block));
            }
        }
    }
}

impl<T, P: CountPolicy> fmt::Debug for Observer<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observer")
            .field("strong", &self.strong().get())
            .field("expired", &self.expired())
            .finish()
    }
}
