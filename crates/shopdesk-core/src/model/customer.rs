use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::EntityId;

/// A customer row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: EntityId,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub zip_code: Option<String>,
    /// Server fields this client does not model.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Customer {
    /// "First Last", skipping missing parts.
    pub fn full_name(&self) -> String {
        join_name(self.first_name.as_deref(), self.last_name.as_deref())
    }
}

pub(crate) fn join_name(first: Option<&str>, last: Option<&str>) -> String {
    [first, last]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
