// ── Application state ──
//
// The one aggregate holding every store. Built once at startup and passed
// by reference; nothing in this crate is a global.

use std::sync::Arc;

use shopdesk_api::{ApiClient, token_cell};
use tracing::debug;

use crate::alert::NotificationSink;
use crate::config::AppConfig;
use crate::dialog::ConfirmationGate;
use crate::error::CoreError;
use crate::router::ErrorRouter;
use crate::session::{SessionHolder, SessionState, TokenStore};
use crate::store::{CustomerStore, EntityStore, OrderStore, ProductStore};

pub struct AppState {
    config: AppConfig,
    alerts: NotificationSink,
    gate: ConfirmationGate,
    router: ErrorRouter,
    session: SessionHolder,
    customers: CustomerStore,
    products: ProductStore,
    orders: OrderStore,
}

impl AppState {
    /// Wire every component together and restore a persisted session.
    pub fn new(config: AppConfig, tokens: Arc<dyn TokenStore>) -> Result<Self, CoreError> {
        let cell = token_cell();
        let api = ApiClient::new(config.api_url.clone(), &config.transport(), cell.clone())?;

        let alerts = NotificationSink::new();
        let state = Arc::new(SessionState::new(cell, tokens));
        let router = ErrorRouter::new(Arc::clone(&state), alerts.clone());
        let session = SessionHolder::new(state, api.clone(), router.clone());
        session.restore()?;

        let customers = EntityStore::new(api.clone(), router.clone(), alerts.clone());
        let products = EntityStore::new(api.clone(), router.clone(), alerts.clone());
        let orders = OrderStore::new(EntityStore::new(api, router.clone(), alerts.clone()));

        debug!(
            api_url = %config.api_url,
            authenticated = session.is_authenticated(),
            "app state ready"
        );
        Ok(Self {
            config,
            alerts,
            gate: ConfirmationGate::new(),
            router,
            session,
            customers,
            products,
            orders,
        })
    }

    /// Route guard: fail unless a session is active.
    pub fn require_session(&self) -> Result<(), CoreError> {
        if self.session.is_authenticated() {
            Ok(())
        } else {
            Err(CoreError::Unauthenticated {
                message: "not logged in".into(),
            })
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn alerts(&self) -> &NotificationSink {
        &self.alerts
    }

    pub fn gate(&self) -> &ConfirmationGate {
        &self.gate
    }

    pub fn router(&self) -> &ErrorRouter {
        &self.router
    }

    pub fn session(&self) -> &SessionHolder {
        &self.session
    }

    pub fn customers(&self) -> &CustomerStore {
        &self.customers
    }

    pub fn products(&self) -> &ProductStore {
        &self.products
    }

    pub fn orders(&self) -> &OrderStore {
        &self.orders
    }
}
