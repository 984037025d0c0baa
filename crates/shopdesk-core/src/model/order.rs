// ── Order types ──
//
// `OrderSummary` is a list row; `OrderDetail` is the full record used to
// rebuild a cart from history.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::EntityId;

/// A row of the order list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub id: EntityId,
    pub order_number: Option<String>,
    pub customer_name: Option<String>,
    pub quantity: Option<i64>,
    pub price: Option<Decimal>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Customer block of an order detail.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCustomer {
    pub id: Option<EntityId>,
    pub name: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub zip_code: Option<String>,
}

/// One persisted line of an order, as the server stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_name: String,
    pub product_price: Decimal,
    pub product_discount: Decimal,
    pub product_quantity: u32,
}

/// A persisted order with its line items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDetail {
    pub id: Option<EntityId>,
    pub order_number: Option<String>,
    pub created_at: Option<String>,
    pub customer: Option<OrderCustomer>,
    pub items: Vec<OrderItem>,
}
