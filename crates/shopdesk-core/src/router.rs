// ── Error router ──
//
// The single place failures surface. An authentication failure clears the
// session silently; client-side rejections stay with the caller; anything
// else becomes an error banner.

use std::sync::Arc;

use tracing::warn;

use crate::alert::NotificationSink;
use crate::error::CoreError;
use crate::model::AlertNotice;
use crate::session::SessionState;

#[derive(Clone)]
pub struct ErrorRouter {
    session: Arc<SessionState>,
    alerts: NotificationSink,
}

impl ErrorRouter {
    pub(crate) fn new(session: Arc<SessionState>, alerts: NotificationSink) -> Self {
        Self { session, alerts }
    }

    /// Dispatch one failure.
    pub fn route(&self, err: &CoreError) {
        match err {
            CoreError::Unauthenticated { message } => {
                warn!(status = 403, message = %message, "session rejected, signing out");
                self.session.invalidate();
            }
            CoreError::Superseded | CoreError::Validation { .. } => {}
            CoreError::Transport { message, reason, .. } => {
                warn!(status = ?err.status(), reason = %reason, "request failed");
                self.alerts.open(AlertNotice::error(message.clone()));
            }
            other => {
                warn!(status = ?other.status(), error = %other, "request failed");
                self.alerts.open(AlertNotice::error(other.to_string()));
            }
        }
    }

    /// Route a failure and hand it back, so the caller gets the same error.
    pub fn reject(&self, err: impl Into<CoreError>) -> CoreError {
        let err = err.into();
        self.route(&err);
        err
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::model::Severity;
    use crate::session::{MemoryTokenStore, TokenStore};

    fn router() -> (ErrorRouter, Arc<SessionState>, NotificationSink, Arc<MemoryTokenStore>) {
        let store = Arc::new(MemoryTokenStore::with_token("tok1"));
        let state = Arc::new(SessionState::new(shopdesk_api::token_cell(), store.clone()));
        let alerts = NotificationSink::new();
        (
            ErrorRouter::new(Arc::clone(&state), alerts.clone()),
            state,
            alerts,
            store,
        )
    }

    #[test]
    fn unauthenticated_clears_session_without_banner() {
        let (router, _, alerts, store) = router();
        router.route(&CoreError::Unauthenticated {
            message: "Forbidden".into(),
        });
        assert!(alerts.current().is_none());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn server_error_opens_one_banner_with_server_message() {
        let (router, _, alerts, store) = router();
        router.route(&CoreError::GlobalError {
            status: 500,
            message: "Out of stock".into(),
        });
        let notice = alerts.current().unwrap();
        assert_eq!(notice.severity, Severity::Error);
        assert_eq!(notice.message, "Out of stock");
        assert!(store.load().unwrap().is_some());
    }

    #[test]
    fn field_errors_also_raise_banner() {
        let (router, _, alerts, _) = router();
        router.route(&CoreError::FieldErrors {
            status: 422,
            message: "The given data was invalid.".into(),
            fields: BTreeMap::from([("email".into(), "taken".into())]),
        });
        assert_eq!(
            alerts.current().map(|n| n.message),
            Some("The given data was invalid.".into())
        );
    }

    #[test]
    fn transport_failure_uses_generic_message() {
        let (router, _, alerts, _) = router();
        router.route(&CoreError::from(shopdesk_api::Error::Tls("bad".into())));
        assert_eq!(
            alerts.current().map(|n| n.message),
            Some("Something went wrong".into())
        );
    }

    #[test]
    fn client_side_rejections_are_silent() {
        let (router, _, alerts, _) = router();
        router.route(&CoreError::Superseded);
        router.route(&CoreError::validation("quantity must be at least 1"));
        assert!(alerts.current().is_none());
    }

    #[test]
    fn reject_returns_the_same_error() {
        let (router, _, alerts, _) = router();
        let err = router.reject(CoreError::GlobalError {
            status: 409,
            message: "Duplicate SKU".into(),
        });
        assert_eq!(err.status(), Some(409));
        assert_eq!(alerts.current().map(|n| n.message), Some("Duplicate SKU".into()));
    }
}
