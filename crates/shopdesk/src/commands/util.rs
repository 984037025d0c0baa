//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;

use shopdesk_core::{AppState, Entity, EntityId, EntityStore, Reply};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

/// Route guard for every resource command.
pub fn require_session(state: &AppState) -> Result<(), CliError> {
    state.require_session().map_err(|_| CliError::NotLoggedIn)
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool, action: &str) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))
}

/// Run a delete through the confirmation gate.
///
/// Returns `None` when the operator declined.
pub async fn confirm_delete<E: Entity>(
    state: &AppState,
    store: &EntityStore<E>,
    id: EntityId,
    global: &GlobalOpts,
) -> Result<Option<Reply<Value>>, CliError> {
    let gate = state.gate();
    let outcome = store.request_delete(gate, id);
    let prompt = gate.prompt().unwrap_or_default();

    let confirmed = confirm(&prompt, global.yes, &format!("delete {}", E::KIND));
    if !matches!(confirmed, Ok(true)) {
        gate.cancel();
    }
    if !confirmed? {
        return Ok(None);
    }

    let spinner = output::spinner(&format!("Deleting {}...", E::KIND), global.quiet);
    gate.confirm().await;
    spinner.finish_and_clear();

    let reply = outcome
        .await
        .map_err(|_| CliError::Internal("delete was dropped before it ran".into()))??;
    Ok(Some(reply))
}

/// Parse a money or percentage argument.
pub fn parse_decimal(field: &str, raw: &str) -> Result<Decimal, CliError> {
    Decimal::from_str(raw.trim()).map_err(|_| CliError::Validation {
        field: field.into(),
        reason: format!("'{raw}' is not a number"),
    })
}

/// One `--item` argument of `orders create`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSpec {
    pub product: EntityId,
    pub quantity: u32,
    pub discount: Decimal,
}

/// Parse `PRODUCT_ID:QTY[:DISCOUNT]`.
pub fn parse_item(raw: &str) -> Result<ItemSpec, CliError> {
    let invalid = |reason: &str| CliError::Validation {
        field: "item".into(),
        reason: format!("'{raw}': {reason}"),
    };

    let mut parts = raw.split(':');
    let product = match parts.next().map(str::trim) {
        Some(id) if !id.is_empty() => EntityId::from(id),
        _ => return Err(invalid("missing product id")),
    };
    let quantity = parts
        .next()
        .ok_or_else(|| invalid("expected PRODUCT_ID:QTY[:DISCOUNT]"))?
        .trim()
        .parse::<u32>()
        .map_err(|_| invalid("quantity must be a whole number"))?;
    let discount = match parts.next() {
        Some(d) => parse_decimal("item", d)?,
        None => Decimal::ZERO,
    };
    if parts.next().is_some() {
        return Err(invalid("too many ':' separators"));
    }

    Ok(ItemSpec {
        product,
        quantity,
        discount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_with_discount() {
        let item = parse_item("12:3:10").unwrap();
        assert_eq!(item.product, EntityId::Numeric(12));
        assert_eq!(item.quantity, 3);
        assert_eq!(item.discount, Decimal::TEN);
    }

    #[test]
    fn item_discount_defaults_to_zero() {
        let item = parse_item("sku-9:1").unwrap();
        assert_eq!(item.product, EntityId::Text("sku-9".into()));
        assert_eq!(item.discount, Decimal::ZERO);
    }

    #[test]
    fn malformed_items_are_rejected() {
        for raw in ["", "12", ":2", "12:x", "12:1:ten", "12:1:5:9"] {
            assert!(
                matches!(parse_item(raw), Err(CliError::Validation { .. })),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn decimal_arguments_keep_cents() {
        assert_eq!(parse_decimal("price", "19.99").unwrap().to_string(), "19.99");
        assert!(parse_decimal("price", "abc").is_err());
    }
}
