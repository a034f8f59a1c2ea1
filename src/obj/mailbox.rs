use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Single-slot hand-off between a worker thread and the frame loop.
///
/// `post` overwrites whatever is waiting; `take` empties the slot, so a
/// value is observed by exactly one frame.
pub struct Mailbox<T> {
    slot: Arc<Mutex<Option<T>>>,
}

impl<T> Mailbox<T> {
    pub fn new() -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<T>> {
        // A panicking poster cannot leave the Option half-written
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn post(&self, value: T) {
        *self.lock() = Some(value);
    }

    pub fn take(&self) -> Option<T> {
        self.lock().take()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_none()
    }
}

impl<T> Clone for Mailbox<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T> Default for Mailbox<T> {
    fn default() -> Self {
        Self::new()
    }
}
