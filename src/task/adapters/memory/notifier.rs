//! Recording notifier for tests.

use std::sync::{Arc, RwLock};

use crate::task::ports::{Notice, Notifier};

/// Notifier that records every delivered notice for later inspection.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    notices: Arc<RwLock<Vec<Notice>>>,
}

impl RecordingNotifier {
    /// Creates an empty recording notifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every notice delivered so far, in order.
    ///
    /// Returns an empty list when the lock is poisoned; the notifier is
    /// fire-and-forget and never surfaces its own failures.
    #[must_use]
    pub fn delivered(&self) -> Vec<Notice> {
        self.notices
            .read()
            .map(|notices| notices.clone())
            .unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: &Notice) {
        if let Ok(mut notices) = self.notices.write() {
            notices.push(notice.clone());
        }
    }
}
