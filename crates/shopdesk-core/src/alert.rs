// ── Notification sink ──
//
// Single-slot holder of the banner currently shown to the operator.
// Opening a notice replaces whatever was there.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use crate::model::AlertNotice;

#[derive(Clone)]
pub struct NotificationSink {
    slot: Arc<watch::Sender<Option<AlertNotice>>>,
}

impl NotificationSink {
    pub fn new() -> Self {
        let (slot, _) = watch::channel(None);
        Self {
            slot: Arc::new(slot),
        }
    }

    /// Show `notice`, replacing any active one.
    pub fn open(&self, notice: AlertNotice) {
        debug!(severity = %notice.severity, message = %notice.message, "alert");
        self.slot.send_replace(Some(notice));
    }

    /// Dismiss the active notice, returning it.
    pub fn close(&self) -> Option<AlertNotice> {
        self.slot.send_replace(None)
    }

    pub fn current(&self) -> Option<AlertNotice> {
        self.slot.borrow().clone()
    }

    /// Take the active notice, leaving the slot empty.
    pub fn take(&self) -> Option<AlertNotice> {
        if self.slot.borrow().is_none() {
            return None;
        }
        self.close()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<AlertNotice>> {
        self.slot.subscribe()
    }
}

impl Default for NotificationSink {
    fn default() -> Self {
        Self::new()
    }
}
