//! Scoped suppression of ambient page scrolling.
//!
//! While the cropper is mounted the hosting surface must not scroll, zoom or
//! select text under the user's finger. The host supplies a [`ScrollLock`]
//! implementation; [`ScrollLockGuard`] locks it on construction and unlocks it
//! exactly once, on explicit release or on drop, whichever comes first. Drop
//! also runs during unwinding, so an aborted cropper cannot leave the page
//! frozen.

/// Capability to freeze and restore the host's scrolling surface.
pub trait ScrollLock {
    fn lock(&mut self);
    fn unlock(&mut self);
}

/// For hosts without a scrollable surface.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopScrollLock;

impl ScrollLock for NoopScrollLock {
    fn lock(&mut self) {}
    fn unlock(&mut self) {}
}

/// Holds a [`ScrollLock`] in the locked state for the guard's lifetime.
#[derive(Debug)]
pub struct ScrollLockGuard<L: ScrollLock> {
    lock: L,
    held: bool,
}

impl<L: ScrollLock> ScrollLockGuard<L> {
    pub fn acquire(mut lock: L) -> Self {
        lock.lock();
        tracing::debug!("scroll lock acquired");
        Self { lock, held: true }
    }

    /// Unlock now. Later calls and the eventual drop do nothing.
    pub fn release(&mut self) {
        if self.held {
            self.held = false;
            self.lock.unlock();
            tracing::debug!("scroll lock released");
        }
    }

    pub fn is_held(&self) -> bool {
        self.held
    }
}

impl<L: ScrollLock> Drop for ScrollLockGuard<L> {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::ScrollLock;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records lock/unlock calls into a shared log.
    #[derive(Debug, Clone, Default)]
    pub struct RecordingLock {
        pub log: Rc<RefCell<Vec<&'static str>>>,
    }

    impl ScrollLock for RecordingLock {
        fn lock(&mut self) {
            self.log.borrow_mut().push("lock");
        }

        fn unlock(&mut self) {
            self.log.borrow_mut().push("unlock");
        }
    }
}
