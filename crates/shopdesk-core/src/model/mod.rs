// ── Domain model ──
//
// Canonical types the stores hold. Converted from `shopdesk-api` wire
// records in `convert.rs`.

mod alert;
mod cart;
mod common;
mod customer;
mod entity_id;
mod order;
mod product;

pub use alert::{AlertNotice, Severity};
pub use cart::{CartLineItem, line_total};
pub use common::{Category, OptionRef, ProductOption};
pub use customer::Customer;
pub use entity_id::EntityId;
pub use order::{OrderCustomer, OrderDetail, OrderItem, OrderSummary};
pub use product::Product;

pub(crate) use cart::sum_totals;
pub(crate) use customer::join_name;
