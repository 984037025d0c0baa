// ── Ordered reactive row collection ──
//
// Rows keep server order, so storage is a plain `Vec` snapshot behind a
// `watch` channel. Every mutation rebuilds and publishes the snapshot, so
// subscribers see each change.

use std::sync::Arc;

use tokio::sync::watch;

/// Shared, immutable view of a collection's rows.
pub type Snapshot<T> = Arc<Vec<Arc<T>>>;

/// Ordered rows with push-based change notification.
pub(crate) struct RowCollection<T: Send + Sync + 'static> {
    /// Full snapshot, replaced on every mutation.
    snapshot: watch::Sender<Snapshot<T>>,
}

impl<T: Send + Sync + 'static> RowCollection<T> {
    pub(crate) fn new() -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));
        Self { snapshot }
    }

    /// Replace every row, keeping the given order.
    pub(crate) fn replace_all(&self, rows: Vec<T>) -> Snapshot<T> {
        let snap: Snapshot<T> = Arc::new(rows.into_iter().map(Arc::new).collect());
        self.publish(Arc::clone(&snap));
        snap
    }

    /// Append a row at the end.
    pub(crate) fn push(&self, row: T) {
        let mut rows = self.cloned_rows();
        rows.push(Arc::new(row));
        self.publish(Arc::new(rows));
    }

    /// Remove the row at `index`. Out-of-range is a no-op.
    pub(crate) fn remove_at(&self, index: usize) -> Option<Arc<T>> {
        let mut rows = self.cloned_rows();
        if index >= rows.len() {
            return None;
        }
        let removed = rows.remove(index);
        self.publish(Arc::new(rows));
        Some(removed)
    }

    /// Drop every row matching `pred`. Returns how many were removed.
    pub(crate) fn remove_where(&self, pred: impl Fn(&T) -> bool) -> usize {
        let rows = self.cloned_rows();
        let before = rows.len();
        let kept: Vec<Arc<T>> = rows.into_iter().filter(|r| !pred(&**r)).collect();
        let removed = before - kept.len();
        if removed > 0 {
            self.publish(Arc::new(kept));
        }
        removed
    }

    /// Remove all rows. Always notifies.
    pub(crate) fn clear(&self) {
        self.publish(Arc::new(Vec::new()));
    }

    /// Current snapshot (cheap `Arc` clone).
    pub(crate) fn snapshot(&self) -> Snapshot<T> {
        self.snapshot.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<Snapshot<T>> {
        self.snapshot.subscribe()
    }

    pub(crate) fn len(&self) -> usize {
        self.snapshot.borrow().len()
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn cloned_rows(&self) -> Vec<Arc<T>> {
        self.snapshot.borrow().iter().cloned().collect()
    }

    fn publish(&self, snap: Snapshot<T>) {
        // `send_replace` updates unconditionally, even with zero receivers.
        self.snapshot.send_replace(snap);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn labels(c: &RowCollection<&'static str>) -> Vec<&'static str> {
        c.snapshot().iter().map(|r| **r).collect()
    }

    #[test]
    fn replace_keeps_order() {
        let c = RowCollection::new();
        let rx = c.subscribe();
        c.replace_all(vec!["b", "a", "c"]);
        assert_eq!(labels(&c), ["b", "a", "c"]);
        assert!(rx.has_changed().unwrap());
    }

    #[test]
    fn remove_at_shifts_later_rows() {
        let c = RowCollection::new();
        c.replace_all(vec!["a", "b", "c", "d"]);
        let removed = c.remove_at(1).unwrap();
        assert_eq!(*removed, "b");
        assert_eq!(labels(&c), ["a", "c", "d"]);
    }

    #[test]
    fn remove_at_out_of_range_is_noop() {
        let c = RowCollection::new();
        c.push("a");
        let rx = c.subscribe();
        assert!(c.remove_at(5).is_none());
        assert_eq!(c.len(), 1);
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn remove_where_reports_count() {
        let c = RowCollection::new();
        c.replace_all(vec!["x", "y", "x"]);
        assert_eq!(c.remove_where(|r| *r == "x"), 2);
        assert_eq!(labels(&c), ["y"]);
        assert_eq!(c.remove_where(|r| *r == "zzz"), 0);
    }

    #[tokio::test]
    async fn subscribers_see_mutations() {
        let c = RowCollection::new();
        let mut rx = c.subscribe();
        c.push("a");
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().len(), 1);
        c.clear();
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_empty());
    }
}
