// ── Cart line items ──
//
// Money is `Decimal` throughout. Totals are rounded to cents, half away
// from zero, and always recomputed locally.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::OptionRef;
use crate::error::CoreError;

/// One line of an order under construction (or loaded from history).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub product: OptionRef,
    pub price: Decimal,
    pub quantity: u32,
    /// Percentage in `0..=100`.
    pub discount: Decimal,
    pub total: Decimal,
}

impl CartLineItem {
    /// Build an item with its total computed. Callers validate ranges.
    pub(crate) fn priced(
        product: OptionRef,
        price: Decimal,
        quantity: u32,
        discount: Decimal,
    ) -> Result<Self, CoreError> {
        Ok(Self {
            total: line_total(price, discount, quantity)?,
            product,
            price,
            quantity,
            discount,
        })
    }
}

/// `round2(price * (1 - discount/100) * quantity)`.
///
/// Fails with [`CoreError::Validation`] when the total does not fit in a
/// `Decimal`.
pub fn line_total(price: Decimal, discount: Decimal, quantity: u32) -> Result<Decimal, CoreError> {
    let overflow = || CoreError::validation("Line total is too large");
    let factor = Decimal::ONE_HUNDRED
        .checked_sub(discount)
        .and_then(|rest| rest.checked_div(Decimal::ONE_HUNDRED))
        .ok_or_else(overflow)?;
    let mut total = price
        .checked_mul(factor)
        .and_then(|unit| unit.checked_mul(Decimal::from(quantity)))
        .ok_or_else(overflow)?
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    total.rescale(2);
    Ok(total)
}

/// Sum of line totals, rescaled to cents.
pub(crate) fn sum_totals<'a>(
    items: impl IntoIterator<Item = &'a CartLineItem>,
) -> Result<Decimal, CoreError> {
    let mut total = items
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, item| acc.checked_add(item.total))
        .ok_or_else(|| CoreError::validation("Grand total is too large"))?;
    total.rescale(2);
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn discounted_total() {
        let total = line_total(dec("100"), dec("10"), 3).unwrap();
        assert_eq!(total, dec("270.00"));
        assert_eq!(total.to_string(), "270.00");
    }

    #[test]
    fn rounds_half_away_from_zero() {
        // 0.125 * 1 rounds up to 0.13
        assert_eq!(line_total(dec("0.125"), Decimal::ZERO, 1).unwrap(), dec("0.13"));
        // 19.99 at 15% off, 3 units: 50.9745 → 50.97
        assert_eq!(line_total(dec("19.99"), dec("15"), 3).unwrap(), dec("50.97"));
    }

    #[test]
    fn full_discount_is_free() {
        assert_eq!(line_total(dec("42.50"), dec("100"), 5).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn oversized_total_is_rejected() {
        assert!(matches!(
            line_total(Decimal::MAX, Decimal::ZERO, 2),
            Err(CoreError::Validation { .. })
        ));
    }

    #[test]
    fn oversized_sum_is_rejected() {
        let item = |total| CartLineItem {
            product: OptionRef::label_only("X"),
            price: total,
            quantity: 1,
            discount: Decimal::ZERO,
            total,
        };
        let items = [item(Decimal::MAX), item(Decimal::ONE)];
        assert!(matches!(sum_totals(&items), Err(CoreError::Validation { .. })));
        assert_eq!(sum_totals(&items[1..]).unwrap(), dec("1.00"));
    }
}
