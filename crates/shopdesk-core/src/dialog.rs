// ── Confirmation gate ──
//
// Single-slot holder of a pending destructive action. States are `Idle`
// and `AwaitingConfirmation`. A new request replaces the pending one and
// the replaced action is dropped without running.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use futures_util::future::BoxFuture;
use tokio::sync::watch;
use tracing::debug;

type PendingAction = Box<dyn FnOnce() -> BoxFuture<'static, ()> + Send>;

/// Observable gate state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GateStatus {
    #[default]
    Idle,
    AwaitingConfirmation { prompt: String },
}

struct Pending {
    prompt: String,
    action: PendingAction,
}

#[derive(Clone)]
pub struct ConfirmationGate {
    inner: Arc<GateInner>,
}

struct GateInner {
    pending: Mutex<Option<Pending>>,
    status: watch::Sender<GateStatus>,
}

impl ConfirmationGate {
    pub fn new() -> Self {
        let (status, _) = watch::channel(GateStatus::Idle);
        Self {
            inner: Arc::new(GateInner {
                pending: Mutex::new(None),
                status,
            }),
        }
    }

    /// Register `action` behind `prompt`.
    ///
    /// Returns the prompt of the request this one replaced, if any; that
    /// request's action is dropped and never invoked.
    pub fn request<F, Fut>(&self, prompt: impl Into<String>, action: F) -> Option<String>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let prompt = prompt.into();
        let pending = Pending {
            prompt: prompt.clone(),
            action: Box::new(move || -> BoxFuture<'static, ()> { Box::pin(action()) }),
        };

        let replaced = self.lock().replace(pending).map(|p| p.prompt);
        if let Some(old) = &replaced {
            debug!(replaced = %old, "confirmation request overwritten");
        }
        self.inner
            .status
            .send_replace(GateStatus::AwaitingConfirmation { prompt });
        replaced
    }

    /// Run the pending action once and return to `Idle`.
    ///
    /// Returns `false` (and does nothing) when no request is pending.
    pub async fn confirm(&self) -> bool {
        let Some(pending) = self.lock().take() else {
            return false;
        };
        self.inner.status.send_replace(GateStatus::Idle);
        (pending.action)().await;
        true
    }

    /// Discard the pending action without running it.
    pub fn cancel(&self) -> Option<String> {
        let cancelled = self.lock().take().map(|p| p.prompt);
        self.inner.status.send_replace(GateStatus::Idle);
        cancelled
    }

    pub fn status(&self) -> GateStatus {
        self.inner.status.borrow().clone()
    }

    /// Prompt of the pending request, if any.
    pub fn prompt(&self) -> Option<String> {
        match self.status() {
            GateStatus::AwaitingConfirmation { prompt } => Some(prompt),
            GateStatus::Idle => None,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<GateStatus> {
        self.inner.status.subscribe()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Pending>> {
        self.inner
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ConfirmationGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn counting_action(
        counter: &Arc<AtomicUsize>,
    ) -> impl FnOnce() -> futures_util::future::Ready<()> + Send + 'static {
        let counter = Arc::clone(counter);
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
            futures_util::future::ready(())
        }
    }

    #[tokio::test]
    async fn confirm_on_idle_is_noop() {
        let gate = ConfirmationGate::new();
        assert!(!gate.confirm().await);
        assert_eq!(gate.status(), GateStatus::Idle);
    }

    #[tokio::test]
    async fn confirm_runs_action_exactly_once() {
        let gate = ConfirmationGate::new();
        let runs = Arc::new(AtomicUsize::new(0));
        gate.request("Delete customer 7?", counting_action(&runs));

        assert_eq!(gate.prompt().as_deref(), Some("Delete customer 7?"));
        assert!(gate.confirm().await);
        assert!(!gate.confirm().await);
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert_eq!(gate.status(), GateStatus::Idle);
    }

    #[tokio::test]
    async fn second_request_abandons_first() {
        let gate = ConfirmationGate::new();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        assert!(gate.request("first", counting_action(&first)).is_none());
        let replaced = gate.request("second", counting_action(&second));
        assert_eq!(replaced.as_deref(), Some("first"));

        gate.confirm().await;
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn cancel_discards_without_running() {
        let gate = ConfirmationGate::new();
        let runs = Arc::new(AtomicUsize::new(0));
        gate.request("Delete?", counting_action(&runs));

        assert_eq!(gate.cancel().as_deref(), Some("Delete?"));
        assert!(!gate.confirm().await);
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }
}
