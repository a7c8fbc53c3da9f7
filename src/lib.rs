//! Exclusive and reference-counted ownership handles with weak observers
//! and pluggable count policies.
//!
//! The crate provides three handle types over heap values, plus a small
//! polymorphic factory built on top of them:
//!
//! - [`Unique<T>`]: sole, transferable ownership. Not clonable; transfer
//!   leaves the source empty; release (with an optional custom disposer)
//!   runs exactly once on every exit path.
//! - [`Shared<T>`]: reference-counted ownership over a manually managed
//!   control block. Cloning adds a reference; the value is destroyed
//!   exactly once, when the strong count reaches zero.
//! - [`Observer<T>`]: a weak, non-owning view of a `Shared` value. It must
//!   be promoted with [`Observer::lock`] before any access and reports
//!   expiration once the value is gone — the tool for breaking reference
//!   cycles.
//! - [`ActionKind`] / [`Action`]: a closed set of variants constructed
//!   behind `Unique<dyn Action>` and invoked polymorphically.
//!
//! Counting is single-threaded by default ([`ThreadLocal`]); the
//! [`ThreadSafe`] policy ([`SyncShared`], [`SyncObserver`]) switches to
//! atomic counts with `Arc`-style orderings.
//!
//! ```
//! use uniq_rc::{Shared, Unique};
//!
//! let owner = Unique::new(41);
//! let shared: Shared<i32> = owner.into();
//! let observer = shared.observe();
//!
//! let locked = observer.lock().expect("still alive");
//! assert_eq!(*locked, 41);
//! assert_eq!(shared.strong_count(), 2);
//!
//! drop(locked);
//! drop(shared);
//! assert!(observer.expired());
//! ```
//!
//! 提供独占与引用计数两种所有权句柄、弱观察者以及可插拔计数策略。
//!
//! - [`Unique<T>`]：独占、可转移的所有权。不可克隆；转移后源句柄变空；
//!   释放（可带自定义释放动作）在每条退出路径上恰好执行一次。
//! - [`Shared<T>`]：基于手工管理控制块的引用计数所有权。克隆增加引用；
//!   值恰好销毁一次，时机是强计数归零。
//! - [`Observer<T>`]：`Shared` 值的弱的、非拥有视图。任何访问前必须
//!   通过 [`Observer::lock`] 提升，值消亡后报告过期——打破引用环的工具。
//! - [`ActionKind`] / [`Action`]：封闭的变体集合，构造为
//!   `Unique<dyn Action>` 并以多态方式调用。
//!
//! 计数默认单线程（[`ThreadLocal`]）；[`ThreadSafe`] 策略
//! （[`SyncShared`]、[`SyncObserver`]）切换为带 `Arc` 式内存序的
//! 原子计数。

mod block;
mod error;
mod factory;
mod observer;
mod policy;
mod shared;
mod sync;
mod unique;

pub use error::{AllocError, UnknownTag};
pub use factory::{Action, ActionKind};
pub use observer::{Observer, SyncObserver};
pub use policy::{CountPolicy, RefCount, ThreadLocal, ThreadSafe};
pub use shared::{Shared, SyncShared};
pub use unique::Unique;

#[cfg(test)]
mod tests;
