// ── Request sequencing ──
//
// A monotonically increasing ticket per call kind. A response is applied
// only if its ticket is still the newest one issued.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub(crate) struct RequestSequence(AtomicU64);

impl RequestSequence {
    /// Issue a ticket for a new call.
    pub(crate) fn issue(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// `true` if no call was issued after `ticket`.
    pub(crate) fn is_latest(&self, ticket: u64) -> bool {
        self.0.load(Ordering::SeqCst) == ticket
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_ticket_supersedes_older() {
        let seq = RequestSequence::default();
        let first = seq.issue();
        let second = seq.issue();
        assert!(!seq.is_latest(first));
        assert!(seq.is_latest(second));
    }
}
