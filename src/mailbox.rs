use std::sync::{Arc, Mutex, MutexGuard};

/// Single-slot handoff between a producer thread and the display loop.
///
/// Only the most recent item is kept, putting a new one drops the previous
/// item if nobody took it yet.
#[derive(Debug)]
pub struct FrameMailbox<T> {
    slot: Arc<Mutex<Option<T>>>,
}

impl<T> Clone for FrameMailbox<T> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
        }
    }
}

impl<T> Default for FrameMailbox<T> {
    fn default() -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
        }
    }
}

impl<T> FrameMailbox<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if an undelivered item was replaced.
    pub fn put(&self, item: T) -> bool {
        let previous = self.lock().replace(item);
        previous.is_some()
    }

    pub fn take(&self) -> Option<T> {
        self.lock().take()
    }

    pub fn clear(&self) {
        // Drop the item outside of the lock, it may hold device resources.
        let item = self.lock().take();
        drop(item);
    }

    fn lock(&self) -> MutexGuard<'_, Option<T>> {
        // A panicking producer must not take the display loop down with it.
        self.slot.lock().unwrap_or_else(|err| err.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn test_keeps_only_latest() {
        let mailbox = FrameMailbox::new();
        assert!(!mailbox.put(1));
        assert!(mailbox.put(2));
        assert!(mailbox.put(3));
        assert_eq!(mailbox.take(), Some(3));
        assert_eq!(mailbox.take(), None);
    }

    #[test]
    fn test_shared_between_threads() {
        let mailbox = FrameMailbox::new();
        let producer = mailbox.clone();
        thread::spawn(move || {
            for i in 0..100 {
                producer.put(i);
            }
        })
        .join()
        .unwrap();
        assert_eq!(mailbox.take(), Some(99));
    }

    #[test]
    fn test_clear() {
        let mailbox = FrameMailbox::new();
        mailbox.put("frame");
        mailbox.clear();
        assert_eq!(mailbox.take(), None);
    }
}
