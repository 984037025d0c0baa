// ── Shared reference types ──
//
// `OptionRef` is the minimal `{ id, label }` pair used by type-ahead search
// results and as an unresolved foreign key in draft forms.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::EntityId;

/// Minimal reference to another entity.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OptionRef {
    pub id: Option<EntityId>,
    pub label: String,
}

impl OptionRef {
    pub fn new(id: impl Into<EntityId>, label: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            label: label.into(),
        }
    }

    /// A reference with a label only (e.g. a line item loaded from history).
    pub fn label_only(label: impl Into<String>) -> Self {
        Self {
            id: None,
            label: label.into(),
        }
    }

    /// `true` when the id is set and non-empty.
    pub fn has_id(&self) -> bool {
        self.id.as_ref().is_some_and(|id| !id.is_empty())
    }
}

/// Product search hit: an `OptionRef` plus the list price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOption {
    #[serde(flatten)]
    pub reference: OptionRef,
    pub price: Option<Decimal>,
}

/// Product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: EntityId,
    pub name: String,
}
