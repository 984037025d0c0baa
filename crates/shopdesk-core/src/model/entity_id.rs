// ── Core identity type ──
//
// The backend hands out numeric ids for most rows but some endpoints send
// them as strings. `EntityId` hides the difference; comparisons and URLs
// go through its string form.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use shopdesk_api::RecordId;

/// Canonical identifier for any back-office entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Numeric(u64),
    Text(String),
}

impl EntityId {
    /// Empty text ids count as absent.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Text(s) if s.trim().is_empty())
    }

    pub fn as_numeric(&self) -> Option<u64> {
        match self {
            Self::Numeric(n) => Some(*n),
            Self::Text(s) => s.parse().ok(),
        }
    }

    /// Identity comparison the way the server sees it: `7` and `"7"` match.
    pub fn matches(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl FromStr for EntityId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl From<u64> for EntityId {
    fn from(n: u64) -> Self {
        Self::Numeric(n)
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        match s.parse::<u64>() {
            Ok(n) => Self::Numeric(n),
            Err(_) => Self::Text(s),
        }
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self::from(s.to_owned())
    }
}

impl From<RecordId> for EntityId {
    fn from(id: RecordId) -> Self {
        match id {
            RecordId::Number(n) => Self::Numeric(n),
            RecordId::Text(s) => Self::from(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_strings_normalize() {
        assert_eq!(EntityId::from("42"), EntityId::Numeric(42));
        assert_eq!(EntityId::from("c-9"), EntityId::Text("c-9".into()));
    }

    #[test]
    fn matches_across_representations() {
        let a = EntityId::Numeric(7);
        let b = EntityId::Text("7".into());
        assert!(a.matches(&b));
        assert!(!a.matches(&EntityId::Numeric(8)));
    }

    #[test]
    fn blank_text_is_empty() {
        assert!(EntityId::Text("  ".into()).is_empty());
        assert!(!EntityId::Numeric(0).is_empty());
    }
}
