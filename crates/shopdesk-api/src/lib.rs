//! Async client for the shopdesk back-office REST API.
//!
//! One [`ApiClient`] serves every resource (customers, products, orders)
//! through the shared `{base}/{path}/...` layout described by
//! [`Resource`]. The bearer token lives in a [`TokenCell`] owned by the
//! caller, so session changes apply to the next request without
//! rebuilding the client.

pub mod auth;
pub mod categories;
pub mod client;
pub mod error;
pub mod models;
pub mod resource;
pub mod transport;

pub use client::{ApiClient, TokenCell, token_cell};
pub use error::{Error, ErrorDetail, ServerError};
pub use models::{
    CategoryRecord, CustomerRecord, LoginResponse, OptionRecord, OrderDetailRecord,
    OrderCustomerRecord, OrderItemRecord, OrderRecord, ProductRecord, RecordId, Reply,
};
pub use resource::{Body, FormPayload, FormValue, Resource, UpdateMethod};
pub use transport::{TlsMode, TransportConfig};
