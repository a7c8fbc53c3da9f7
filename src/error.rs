use std::alloc::Layout;
use thiserror::Error;

/// A fallible allocation request could not be satisfied.
///
/// Returned by `Unique::try_new` and `Shared::try_new`. No handle is left
/// partially constructed: on failure, neither the value nor its control
/// block exists on the heap.
///
/// 一次可失败的分配请求无法被满足。
///
/// 由 `Unique::try_new` 与 `Shared::try_new` 返回。不会留下半构造的
/// 句柄：失败时，值与其控制块都不存在于堆上。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("allocation of {size} bytes (align {align}) failed")]
pub struct AllocError {
    /// Requested size in bytes.
    /// 请求的字节数。
    pub size: usize,
    /// Requested alignment.
    /// 请求的对齐。
    pub align: usize,
}

impl AllocError {
    pub(crate) fn new(layout: Layout) -> Self {
        AllocError {
            size: layout.size(),
            align: layout.align(),
        }
    }
}

/// A raw discriminator byte named no known action variant.
///
/// Unknown tags are a logic error at the boundary where raw tags enter the
/// program; there is no recovery beyond rejecting the tag.
///
/// 原始判别字节没有对应任何已知的动作变体。
///
/// 未知标签是原始标签进入程序边界处的逻辑错误；
/// 除了拒绝该标签外没有其他恢复手段。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown action tag: {0}")]
pub struct UnknownTag(pub u8);
