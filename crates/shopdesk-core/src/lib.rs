//! Reactive store layer between `shopdesk-api` and front ends.
//!
//! - **[`AppState`]**: the aggregate built once at startup. Owns the
//!   session, the notification sink, the confirmation gate and one store
//!   per resource.
//!
//! - **[`EntityStore<E>`]**: list rows behind a `watch` channel plus the
//!   CRUD contract. Every failure goes to the [`ErrorRouter`] *and* back to
//!   the caller, so banners and field highlighting both work.
//!
//! - **[`Cart`]**: order line-item aggregation with locally computed,
//!   cent-rounded totals.
//!
//! - **[`SessionHolder`]**: bearer token lifecycle. The token is persisted
//!   through a [`TokenStore`] and shared with the HTTP client through a
//!   lock-free cell.

pub mod alert;
pub mod app_state;
pub mod config;
mod convert;
pub mod dialog;
pub mod error;
pub mod model;
pub mod router;
mod sequence;
pub mod session;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use alert::NotificationSink;
pub use app_state::AppState;
pub use config::{AppConfig, TlsVerification};
pub use dialog::{ConfirmationGate, GateStatus};
pub use error::CoreError;
pub use router::ErrorRouter;
pub use session::{MemoryTokenStore, Session, SessionHolder, TOKEN_KEY, TokenStore};
pub use store::requests::{CustomerInput, ImageFormat, ImageUpload, MAX_IMAGE_BYTES, ProductInput};
pub use store::{
    Cart, CustomerStore, Entity, EntityStore, OrderFormErrors, OrderStore, ProductStore,
    SELECT_PRODUCT_HINT, Snapshot,
};
pub use stream::RowStream;

pub use model::{
    AlertNotice, CartLineItem, Category, Customer, EntityId, OptionRef, OrderCustomer,
    OrderDetail, OrderItem, OrderSummary, Product, ProductOption, Severity, line_total,
};

pub use shopdesk_api::{Reply, TokenCell};
