use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::EntityId;

/// A product row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: EntityId,
    pub name: Option<String>,
    pub category_id: Option<EntityId>,
    pub category: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i64>,
    pub image: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
