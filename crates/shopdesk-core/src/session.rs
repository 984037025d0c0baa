// ── Session holder ──
//
// Owns the bearer token. The token lives in three places that must agree:
// the shared `TokenCell` the HTTP client reads, the durable `TokenStore`,
// and the observable `Session` value. Only this module writes them.

use std::sync::{Arc, Mutex, PoisonError};

use secrecy::{ExposeSecret, SecretString};
use shopdesk_api::{ApiClient, TokenCell};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::error::CoreError;
use crate::router::ErrorRouter;

/// Fixed key the token is persisted under.
pub const TOKEN_KEY: &str = "_token";

/// Replacement message for a rejected login.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username or password credentials!";

/// Observable authentication state. `authenticated` is derived from the
/// token, so the two can never disagree.
#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Option<Arc<SecretString>>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn token(&self) -> Option<&SecretString> {
        self.token.as_deref()
    }
}

// ── Token persistence ────────────────────────────────────────────────

/// Durable storage for the bearer token, keyed by [`TOKEN_KEY`].
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<SecretString>, CoreError>;
    fn save(&self, token: &SecretString) -> Result<(), CoreError>;
    fn clear(&self) -> Result<(), CoreError>;
}

/// Process-local token store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    slot: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<SecretString>, CoreError> {
        let slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(slot.clone().map(SecretString::from))
    }

    fn save(&self, token: &SecretString) -> Result<(), CoreError> {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(token.expose_secret().to_owned());
        Ok(())
    }

    fn clear(&self) -> Result<(), CoreError> {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = None;
        Ok(())
    }
}

// ── Shared session state ─────────────────────────────────────────────

/// The writable half of the session, shared with the error router so a
/// 403 can invalidate without a reference back to the holder.
pub(crate) struct SessionState {
    cell: TokenCell,
    store: Arc<dyn TokenStore>,
    session: watch::Sender<Session>,
}

impl SessionState {
    pub(crate) fn new(cell: TokenCell, store: Arc<dyn TokenStore>) -> Self {
        let (session, _) = watch::channel(Session::default());
        Self {
            cell,
            store,
            session,
        }
    }

    fn install(&self, token: SecretString) {
        let token = Arc::new(token);
        self.cell.store(Some(Arc::clone(&token)));
        self.session.send_replace(Session { token: Some(token) });
    }

    /// Clear the token everywhere. Storage failures are logged, not raised:
    /// the in-memory session is already unauthenticated.
    pub(crate) fn invalidate(&self) {
        self.cell.store(None);
        self.session.send_replace(Session::default());
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "failed to clear persisted token");
        }
    }
}

// ── Holder ───────────────────────────────────────────────────────────

/// Login, logout and session restore.
#[derive(Clone)]
pub struct SessionHolder {
    state: Arc<SessionState>,
    api: ApiClient,
    router: ErrorRouter,
}

impl SessionHolder {
    pub(crate) fn new(state: Arc<SessionState>, api: ApiClient, router: ErrorRouter) -> Self {
        Self { state, api, router }
    }

    /// Rehydrate from the token store. Returns whether a token was found.
    pub fn restore(&self) -> Result<bool, CoreError> {
        match self.state.store.load()? {
            Some(token) if !token.expose_secret().is_empty() => {
                self.state.install(token);
                info!("session restored");
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Exchange credentials for a token, persist it, and mark the session
    /// authenticated.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<(), CoreError> {
        let reply = match self.api.login(email, password).await {
            Ok(reply) => reply,
            Err(err) => return Err(self.router.reject(login_error(err))),
        };

        let token = SecretString::from(reply.access_token);
        if let Err(e) = self.state.store.save(&token) {
            return Err(self.router.reject(e));
        }
        self.state.install(token);
        info!(email, "logged in");
        Ok(())
    }

    /// Revoke the token on the server, then forget it locally.
    ///
    /// A failed logout leaves the session as it was, except a 403 which
    /// clears it through the error router.
    pub async fn logout(&self) -> Result<Option<String>, CoreError> {
        match self.api.logout().await {
            Ok(reply) => {
                self.state.invalidate();
                info!("logged out");
                Ok(reply.message)
            }
            Err(err) => Err(self.router.reject(err)),
        }
    }

    /// Drop the session without talking to the server.
    pub fn invalidate(&self) {
        self.state.invalidate();
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.session.borrow().is_authenticated()
    }

    pub fn current(&self) -> Session {
        self.state.session.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.session.subscribe()
    }
}

/// Login rejections carry `error: "Unauthorized"`; show a readable message.
fn login_error(err: shopdesk_api::Error) -> CoreError {
    match err {
        shopdesk_api::Error::Server(server) if server.error.as_deref() == Some("Unauthorized") => {
            CoreError::GlobalError {
                status: server.status,
                message: INVALID_CREDENTIALS_MESSAGE.into(),
            }
        }
        other => CoreError::from(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryTokenStore::new();
        assert!(store.load().unwrap().is_none());
        store.save(&SecretString::from("tok1".to_owned())).unwrap();
        assert_eq!(
            store.load().unwrap().map(|t| t.expose_secret().to_owned()),
            Some("tok1".into())
        );
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn invalidate_clears_cell_and_store() {
        let cell = shopdesk_api::token_cell();
        let store = Arc::new(MemoryTokenStore::with_token("tok1"));
        let state = SessionState::new(cell.clone(), store.clone());
        state.install(SecretString::from("tok1".to_owned()));
        assert!(cell.load().is_some());

        state.invalidate();
        assert!(cell.load().is_none());
        assert!(!state.session.borrow().is_authenticated());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn unauthorized_login_gets_friendly_message() {
        let err = login_error(shopdesk_api::Error::Server(shopdesk_api::ServerError {
            status: 401,
            message: "Unauthorized".into(),
            error: Some("Unauthorized".into()),
            detail: shopdesk_api::ErrorDetail::None,
        }));
        assert_eq!(err.to_string(), INVALID_CREDENTIALS_MESSAGE);
    }
}
