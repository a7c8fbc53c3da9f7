use crate::error::AllocError;
use crate::policy::{CountPolicy, RefCount};
use std::alloc::{self, Layout};
use std::mem::ManuallyDrop;
use std::ptr::NonNull;

/// Type-erased disposal action stored in a control block.
///
/// `Send` so that a thread-safe block may run it on whichever thread
/// releases the last strong handle.
///
/// 存放在控制块中的类型擦除释放动作。
///
/// 要求 `Send`，这样线程安全的控制块可以在释放最后一个
/// 强句柄的任意线程上执行它。
pub(crate) type DisposeFn<T> = Box<dyn FnOnce(T) + Send>;

/// The control block behind `Shared` and `Observer` handles.
///
/// Counts and value live in one allocation, so a value never exists without
/// its bookkeeping. Count protocol:
///
/// - `strong` equals the number of live `Shared` handles. It reaches zero
///   exactly once; at that moment the value is disposed in place.
/// - All strong handles collectively hold one weak reference, so `weak`
///   reaching zero means no handle of any kind remains and the block itself
///   is deallocated.
///
/// `Shared` 与 `Observer` 句柄背后的控制块。
///
/// 计数与值位于同一次分配中，因此值永远不会脱离其簿记而存在。计数协议：
///
/// - `strong` 等于存活的 `Shared` 句柄数。它恰好归零一次，
///   归零时值被就地释放。
/// - 所有强句柄共同持有一个弱引用，因此 `weak` 归零意味着
///   不再有任何句柄，控制块本身随之被释放。
pub(crate) struct Block<T, P: CountPolicy> {
    pub(crate) strong: P::Count,
    pub(crate) weak: P::Count,
    pub(crate) dispose: Option<DisposeFn<T>>,
    pub(crate) value: ManuallyDrop<T>,
}

impl<T, P: CountPolicy> Block<T, P> {
    /// A fresh block owning `value`, with both counts at one.
    /// 拥有 `value` 的新控制块，两个计数均为一。
    pub(crate) fn new(value: T, dispose: Option<DisposeFn<T>>) -> Self {
        Block {
            strong: P::Count::one(),
            weak: P::Count::one(),
            dispose,
            value: ManuallyDrop::new(value),
        }
    }

    /// Heap-allocate a block, reporting failure instead of aborting.
    ///
    /// Either the whole block (value included) exists on the heap, or
    /// nothing does; `value` is dropped on failure.
    ///
    /// 在堆上分配控制块，分配失败时报告错误而不是中止进程。
    ///
    /// 要么整个控制块（含值）存在于堆上，要么什么都不存在；
    /// 失败时 `value` 会被丢弃。
    pub(crate) fn try_alloc(
        value: T,
        dispose: Option<DisposeFn<T>>,
    ) -> Result<NonNull<Self>, AllocError> {
        // Never zero-sized: the two counts are always present.
        // 永远不是零大小：两个计数始终存在。
        let layout = Layout::new::<Self>();
        let raw = unsafe { alloc::alloc(layout) } as *mut Self;
        let Some(ptr) = NonNull::new(raw) else {
            return Err(AllocError::new(layout));
        };
        unsafe {
            ptr.as_ptr().write(Block::new(value, dispose));
        }
        Ok(ptr)
    }
}
