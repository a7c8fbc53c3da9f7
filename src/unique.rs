use crate::error::AllocError;
use std::alloc::{self, Layout};
use std::fmt;
use std::ops::{Deref, DerefMut};

/// Disposal action for an exclusively owned value.
/// 独占所有值的释放动作。
pub(crate) type BoxDispose<T> = Box<dyn FnOnce(Box<T>) + Send>;

/// An exclusive, transferable owner of a heap value.
///
/// `Unique<T>` holds at most one heap allocation. It cannot be cloned, so
/// two owners of the same allocation are unrepresentable; ownership moves
/// either with the handle itself or explicitly via [`take`](Unique::take),
/// which leaves the source empty. When the owner is released (scope exit,
/// [`reset`](Unique::reset), or the final drop after a transfer), the value
/// is destroyed exactly once, on every exit path.
///
/// **Custom disposal**: [`with_disposer`](Unique::with_disposer) attaches a
/// release action other than plain deletion, for resources whose cleanup is
/// not just memory (handles, temp files). The action runs exactly once, with
/// the owned value, at release time — and never after
/// [`into_box`](Unique::into_box) has escaped the value.
///
/// **Fail-fast contract**: dereferencing an empty handle panics. Use
/// [`as_ref`](Unique::as_ref) / [`as_mut`](Unique::as_mut) when emptiness is
/// an expected state.
///
/// ```
/// use uniq_rc::Unique;
///
/// let mut owner = Unique::new(String::from("data"));
/// let taken = owner.take();
/// assert!(owner.is_empty());
/// assert_eq!(&*taken, "data");
/// ```
///
/// 堆值的独占、可转移所有者。
///
/// `Unique<T>` 至多持有一次堆分配。它不可克隆，因此同一分配的两个
/// 所有者无法表示；所有权要么随句柄本身移动，要么通过
/// [`take`](Unique::take) 显式转移，转移后源句柄变空。所有者被释放时
/// （作用域退出、[`reset`](Unique::reset)、或转移后的最终 drop），
/// 值在每条退出路径上都恰好被销毁一次。
///
/// **自定义释放**：[`with_disposer`](Unique::with_disposer) 附加一个
/// 不同于普通删除的释放动作，用于清理不只是内存的资源（句柄、临时
/// 文件）。该动作在释放时携带所拥有的值恰好执行一次，并且在
/// [`into_box`](Unique::into_box) 让值逃逸之后绝不执行。
///
/// **快速失败合约**：解引用空句柄会 panic。当"空"是预期状态时，
/// 使用 [`as_ref`](Unique::as_ref) / [`as_mut`](Unique::as_mut)。
pub struct Unique<T: ?Sized> {
    pub(crate) value: Option<Box<T>>,
    pub(crate) dispose: Option<BoxDispose<T>>,
}

impl<T> Unique<T> {
    /// Allocate `value` on the heap and take sole ownership of it.
    /// 在堆上分配 `value` 并取得其独占所有权。
    #[inline]
    pub fn new(value: T) -> Self {
        Unique {
            value: Some(Box::new(value)),
            dispose: None,
        }
    }

    /// Like [`new`](Unique::new), but reports allocation failure instead of
    /// aborting the process.
    ///
    /// 与 [`new`](Unique::new) 相同，但分配失败时报告错误而不是中止进程。
    pub fn try_new(value: T) -> Result<Self, AllocError> {
        let layout = Layout::new::<T>();
        if layout.size() == 0 {
            // Boxing a ZST performs no allocation and cannot fail.
            // 装箱零大小类型不进行分配，不会失败。
            return Ok(Self::new(value));
        }
        let raw = unsafe { alloc::alloc(layout) } as *mut T;
        if raw.is_null() {
            return Err(AllocError::new(layout));
        }
        unsafe {
            raw.write(value);
            Ok(Self::from_box(Box::from_raw(raw)))
        }
    }

    /// Take ownership of `value` with a custom release action.
    ///
    /// `dispose` is invoked exactly once, with the owned value, when the
    /// owner releases it.
    ///
    /// 以自定义释放动作取得 `value` 的所有权。
    ///
    /// 所有者释放值时，`dispose` 会携带该值恰好被调用一次。
    ///
    /// ```
    /// use std::sync::atomic::{AtomicUsize, Ordering};
    /// use std::sync::Arc;
    /// use uniq_rc::Unique;
    ///
    /// let closed = Arc::new(AtomicUsize::new(0));
    /// let recorder = Arc::clone(&closed);
    /// {
    ///     let _conn = Unique::with_disposer(7u32, move |_id| {
    ///         recorder.fetch_add(1, Ordering::SeqCst);
    ///     });
    /// }
    /// assert_eq!(closed.load(Ordering::SeqCst), 1);
    /// ```
    pub fn with_disposer<F>(value: T, dispose: F) -> Self
    where
        F: FnOnce(T) + Send + 'static,
    {
        Unique {
            value: Some(Box::new(value)),
            dispose: Some(Box::new(move |boxed: Box<T>| dispose(*boxed))),
        }
    }
}

impl<T: ?Sized> Unique<T> {
    /// An owner holding nothing.
    /// 不持有任何东西的所有者。
    #[inline]
    pub const fn empty() -> Self {
        Unique {
            value: None,
            dispose: None,
        }
    }

    /// Take ownership of an already boxed value. This is the entry point for
    /// unsized contents such as `Box<[T]>` or `Box<dyn Trait>`.
    ///
    /// 取得已装箱值的所有权。这是 `Box<[T]>`、`Box<dyn Trait>` 等
    /// 非固定大小内容的入口。
    #[inline]
    pub fn from_box(value: Box<T>) -> Self {
        Unique {
            value: Some(value),
            dispose: None,
        }
    }

    /// Like [`from_box`](Unique::from_box), with a custom release action
    /// that receives the box.
    ///
    /// 与 [`from_box`](Unique::from_box) 相同，但带有接收整个箱体的
    /// 自定义释放动作。
    pub fn from_box_with_disposer<F>(value: Box<T>, dispose: F) -> Self
    where
        F: FnOnce(Box<T>) + Send + 'static,
    {
        Unique {
            value: Some(value),
            dispose: Some(Box::new(dispose)),
        }
    }

    /// True iff the handle currently owns a value.
    /// 当且仅当句柄当前拥有一个值时为真。
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }

    /// Borrow the owned value, if any. The borrow is bounded by the owner's
    /// lifetime.
    ///
    /// 借用所拥有的值（若有）。借用受所有者生命周期约束。
    #[inline]
    pub fn as_ref(&self) -> Option<&T> {
        self.value.as_deref()
    }

    /// Mutably borrow the owned value, if any.
    /// 可变借用所拥有的值（若有）。
    #[inline]
    pub fn as_mut(&mut self) -> Option<&mut T> {
        self.value.as_deref_mut()
    }

    /// Transfer ownership out of this handle, leaving it empty.
    ///
    /// The value and any attached disposer both move to the returned owner;
    /// no reference counting is involved and the operation is O(1).
    ///
    /// 将所有权从此句柄转移出去，使其变空。
    ///
    /// 值与附加的释放动作都移动到返回的所有者；不涉及引用计数，
    /// 操作为 O(1)。
    #[inline]
    pub fn take(&mut self) -> Unique<T> {
        Unique {
            value: self.value.take(),
            dispose: self.dispose.take(),
        }
    }

    /// Release the owned value now. The disposer (or plain drop) runs
    /// exactly once; releasing an empty handle is a no-op.
    ///
    /// 立即释放所拥有的值。释放动作（或普通 drop）恰好执行一次；
    /// 释放空句柄是空操作。
    pub fn reset(&mut self) {
        if let Some(value) = self.value.take() {
            match self.dispose.take() {
                Some(dispose) => dispose(value),
                None => drop(value),
            }
        }
    }

    /// Escape ownership as a plain `Box`, bypassing the disposer.
    ///
    /// The release action is discarded and will never run for this value.
    ///
    /// 以普通 `Box` 形式让所有权逃逸，绕过释放动作。
    /// 释放动作被丢弃，永远不会对该值执行。
    #[inline]
    pub fn into_box(mut self) -> Option<Box<T>> {
        self.dispose = None;
        self.value.take()
    }
}

impl<T: ?Sized> Drop for Unique<T> {
    fn drop(&mut self) {
        self.reset();
    }
}

impl<T: ?Sized> Default for Unique<T> {
    #[inline]
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: ?Sized> From<Box<T>> for Unique<T> {
    #[inline]
    fn from(value: Box<T>) -> Self {
        Self::from_box(value)
    }
}

impl<T> From<Vec<T>> for Unique<[T]> {
    #[inline]
    fn from(values: Vec<T>) -> Self {
        Self::from_box(values.into_boxed_slice())
    }
}

impl<T: ?Sized> Deref for Unique<T> {
    type Target = T;

    /// # Panics
    /// Panics if the handle is empty.
    ///
    /// # Panics
    /// 句柄为空时 panic。
    #[inline]
    fn deref(&self) -> &T {
        self.value
            .as_deref()
            .expect("dereferenced an empty Unique handle")
    }
}

impl<T: ?Sized> DerefMut for Unique<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut T {
        self.value
            .as_deref_mut()
            .expect("dereferenced an empty Unique handle")
    }
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for Unique<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => f.debug_tuple("Unique").field(value).finish(),
            None => f.write_str("Unique(<empty>)"),
        }
    }
}
