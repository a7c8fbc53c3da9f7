#[cfg(feature = "loom")]
pub use loom::sync::atomic::{AtomicUsize, Ordering, fence};
#[cfg(not(feature = "loom"))]
pub use std::sync::atomic::{AtomicUsize, Ordering, fence};
