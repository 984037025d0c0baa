// Wire records
//
// Shapes of the JSON the back-office API returns. Optional fields default
// so partially populated rows still deserialize; anything unknown lands in
// `extra`.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Record identifier. The backend mixes numeric and string ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(u64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Success envelope with the `data` member already extracted.
#[derive(Debug, Clone)]
pub struct Reply<T> {
    pub message: Option<String>,
    pub data: T,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CustomerRecord {
    pub id: RecordId,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductRecord {
    pub id: RecordId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category_id: Option<RecordId>,
    /// Category display name, when the list endpoint joins it in.
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub stock: Option<i64>,
    /// Image URL or storage path.
    #[serde(default)]
    pub image: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryRecord {
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
}

/// Row of the order list.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderRecord {
    pub id: RecordId,
    #[serde(default)]
    pub order_number: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Full order as returned by `GET /v1/orders/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderDetailRecord {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub order_number: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub customer: Option<OrderCustomerRecord>,
    #[serde(default)]
    pub items: Vec<OrderItemRecord>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Customer embedded in an order detail. Every field is optional here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderCustomerRecord {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderItemRecord {
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub product_price: Decimal,
    #[serde(default)]
    pub product_discount: Decimal,
    #[serde(default, deserialize_with = "lenient_count")]
    pub product_quantity: Option<i64>,
}

/// Entry of a search result: `{ id, label, price? }`.
#[derive(Debug, Clone, Deserialize)]
pub struct OptionRecord {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub price: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Counts arrive as numbers or numeric strings depending on the endpoint.
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Float(f64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Int(n)) => Ok(Some(n)),
        #[allow(clippy::cast_possible_truncation)]
        Some(Raw::Float(f)) => Ok(Some(f as i64)),
        Some(Raw::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Raw::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
