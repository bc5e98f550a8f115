//! Page-wide scroll lock held while an overlay is open.
//!
//! Each overlay holds a guard; the page scrolls again once the last guard
//! is dropped, however the overlay went away.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::trace;

#[derive(Debug, Clone, Default)]
pub struct ScrollLock {
    holders: Arc<AtomicUsize>,
}

impl ScrollLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&self) -> ScrollLockGuard {
        let holders = self.holders.fetch_add(1, Ordering::SeqCst) + 1;
        trace!(holders, "Scroll locked");
        ScrollLockGuard {
            holders: Arc::clone(&self.holders),
        }
    }

    pub fn is_locked(&self) -> bool {
        self.holders.load(Ordering::SeqCst) > 0
    }
}

#[derive(Debug)]
pub struct ScrollLockGuard {
    holders: Arc<AtomicUsize>,
}

impl Drop for ScrollLockGuard {
    fn drop(&mut self) {
        let holders = self.holders.fetch_sub(1, Ordering::SeqCst) - 1;
        trace!(holders, "Scroll lock released");
    }
}
