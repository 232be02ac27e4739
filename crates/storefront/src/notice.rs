//! Notice channel: one-way user-facing messages.
//!
//! Cart operations never return errors to their caller. Rejections and
//! failures are reported here instead, as one of the fixed [`Notice`] values.

use parking_lot::Mutex;

use rocket_shoes_core::Notice;

/// Receiver of user-facing notices.
///
/// Notices are fire-and-forget: `notify` returns nothing and must not block.
pub trait Notifier: Send + Sync {
    /// Show a notice to the user.
    fn notify(&self, notice: Notice);
}

/// A no-op notifier for when notices are not displayed anywhere.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _notice: Notice) {}
}

/// A notifier that keeps notices until they are taken.
///
/// Used by front ends that render notices after an operation completes.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl MemoryNotifier {
    /// Create an empty notifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Notices received so far, oldest first.
    #[must_use]
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().clone()
    }

    /// Remove and return all notices received so far.
    pub fn take(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.lock())
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().push(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_notifier_take_drains() {
        let notifier = MemoryNotifier::new();
        notifier.notify(Notice::OutOfStock);
        notifier.notify(Notice::AddFailed);

        assert_eq!(notifier.notices(), vec![Notice::OutOfStock, Notice::AddFailed]);
        assert_eq!(notifier.take(), vec![Notice::OutOfStock, Notice::AddFailed]);
        assert!(notifier.notices().is_empty());
    }
}
