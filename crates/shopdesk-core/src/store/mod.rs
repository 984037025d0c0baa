// ── Entity stores ──
//
// `EntityStore<E>` carries the shared list/CRUD contract; the per-resource
// modules add typed payloads on top.

mod cart;
mod collection;
mod customer;
mod entity;
mod order;
mod product;
pub mod requests;

pub use cart::{Cart, OrderFormErrors, SELECT_PRODUCT_HINT};
pub use collection::Snapshot;
pub use customer::CustomerStore;
pub use entity::{Entity, EntityStore};
pub use order::OrderStore;
pub use product::ProductStore;
