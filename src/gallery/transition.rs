/// Guard against overlapping page transitions.
///
/// The lock is held by a transition token. Only the release carrying that
/// same token frees it, so a late release from an earlier transition can't
/// cut a newer one short.
#[derive(Debug, Default)]
pub struct TransitionLock {
    held_by: Option<u64>,
}

impl TransitionLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_locked(&self) -> bool {
        self.held_by.is_some()
    }

    /// Returns false if a transition is already in flight.
    pub fn try_acquire(&mut self, token: u64) -> bool {
        if self.is_locked() {
            return false;
        }
        self.held_by = Some(token);
        true
    }

    /// Returns whether the lock was released.
    pub fn release(&mut self, token: u64) -> bool {
        if self.held_by == Some(token) {
            self.held_by = None;
            true
        } else {
            false
        }
    }

    pub fn force_release(&mut self) {
        self.held_by = None;
    }
}
