//! Percent-weighted average price across a set of allocations.

use rust_decimal::Decimal;

use super::error::{checked_add, checked_div, checked_mul, CalcError};
use crate::models::Allocation;

/// Normalized weight of each row that carries weight.
///
/// Rows with a non-positive price or percent are skipped. The returned
/// `(allocation, weight)` pairs have weights `percent / sum(valid percents)`,
/// so they sum to one whatever scale the percents are on.
pub fn normalized_weights(
    allocations: &[Allocation],
    set: &'static str,
) -> Result<Vec<(Allocation, Decimal)>, CalcError> {
    let valid: Vec<Allocation> = allocations.iter().copied().filter(Allocation::is_weighted).collect();
    if valid.is_empty() {
        return Err(CalcError::EmptyAllocation { set });
    }

    let total = valid
        .iter()
        .try_fold(Decimal::ZERO, |acc, a| checked_add(acc, a.percent, "allocation total"))?;
    valid
        .into_iter()
        .map(|a| Ok((a, checked_div(a.percent, total, "allocation weight")?)))
        .collect()
}

/// Weighted price: sum(price * percent) / sum(percent) over valid rows.
///
/// Re-normalizes against the valid percents rather than assuming they
/// already sum to 100%, so a partially filled list still yields a price.
pub fn weighted_price(allocations: &[Allocation], set: &'static str) -> Result<Decimal, CalcError> {
    let mut numerator = Decimal::ZERO;
    let mut total = Decimal::ZERO;
    for a in allocations.iter().filter(|a| a.is_weighted()) {
        let contribution = checked_mul(a.price, a.percent, "weighted price")?;
        numerator = checked_add(numerator, contribution, "weighted price")?;
        total = checked_add(total, a.percent, "allocation total")?;
    }

    if total.is_zero() {
        return Err(CalcError::EmptyAllocation { set });
    }
    checked_div(numerator, total, "weighted price")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_weighted_price_single() {
        let rows = vec![Allocation::new(dec!(100), dec!(100))];
        assert_eq!(weighted_price(&rows, "entries"), Ok(dec!(100)));
    }

    #[test]
    fn test_weighted_price_renormalizes_partial_sets() {
        // 60/20 on the 0-100 scale only sums to 80, weights are 0.75/0.25
        let rows = vec![
            Allocation::new(dec!(100), dec!(60)),
            Allocation::new(dec!(80), dec!(20)),
        ];
        assert_eq!(weighted_price(&rows, "entries"), Ok(dec!(95)));

        // Same weights on the 0-1 scale give the same price
        let fractions = vec![
            Allocation::new(dec!(100), dec!(0.6)),
            Allocation::new(dec!(80), dec!(0.2)),
        ];
        assert_eq!(weighted_price(&fractions, "entries"), Ok(dec!(95)));
    }

    #[test]
    fn test_weighted_price_skips_placeholders() {
        let rows = vec![
            Allocation::new(dec!(100), dec!(50)),
            Allocation::placeholder(),
            Allocation::new(dec!(200), Decimal::ZERO),
            Allocation::new(Decimal::ZERO, dec!(50)),
            Allocation::new(dec!(110), dec!(50)),
        ];
        assert_eq!(weighted_price(&rows, "entries"), Ok(dec!(105)));
    }

    #[test]
    fn test_duplicate_prices_count_separately() {
        let rows = vec![
            Allocation::new(dec!(100), dec!(25)),
            Allocation::new(dec!(100), dec!(25)),
            Allocation::new(dec!(120), dec!(50)),
        ];
        assert_eq!(weighted_price(&rows, "entries"), Ok(dec!(110)));
    }

    #[test]
    fn test_empty_set_is_not_zero() {
        assert_eq!(
            weighted_price(&[], "take-profits"),
            Err(CalcError::EmptyAllocation { set: "take-profits" })
        );
        assert_eq!(
            weighted_price(&[Allocation::placeholder()], "entries"),
            Err(CalcError::EmptyAllocation { set: "entries" })
        );
        assert!(normalized_weights(&[Allocation::placeholder()], "entries").is_err());
    }

    #[test]
    fn test_huge_prices_overflow_instead_of_panicking() {
        let rows = vec![Allocation::new(dec!(1e27), dec!(100))];
        assert_eq!(
            weighted_price(&rows, "entries"),
            Err(CalcError::Overflow { context: "weighted price" })
        );

        // Fractions keep the same prices in range
        let rows = vec![Allocation::new(dec!(1e27), dec!(1))];
        assert_eq!(weighted_price(&rows, "entries"), Ok(dec!(1e27)));
    }

    fn allocation_strategy() -> impl Strategy<Value = Allocation> {
        (0i64..1_000_000, 0i64..10_000)
            .prop_map(|(price, percent)| Allocation::new(Decimal::new(price, 2), Decimal::new(percent, 2)))
    }

    proptest! {
        #[test]
        fn prop_weights_sum_to_one(rows in prop::collection::vec(allocation_strategy(), 1..8)) {
            prop_assume!(rows.iter().any(Allocation::is_weighted));
            let weights = normalized_weights(&rows, "entries").unwrap();
            let sum: Decimal = weights.iter().map(|(_, w)| *w).sum();
            prop_assert!((sum - Decimal::ONE).abs() < dec!(0.000000000001));
        }

        #[test]
        fn prop_weighted_price_within_bounds(rows in prop::collection::vec(allocation_strategy(), 1..8)) {
            prop_assume!(rows.iter().any(Allocation::is_weighted));
            let price = weighted_price(&rows, "entries").unwrap();
            let valid = rows.iter().filter(|a| a.is_weighted());
            let lo = valid.clone().map(|a| a.price).min().unwrap();
            let hi = valid.map(|a| a.price).max().unwrap();
            prop_assert!(price >= lo - dec!(0.000000000001));
            prop_assert!(price <= hi + dec!(0.000000000001));
        }

        #[test]
        fn prop_weighted_price_is_idempotent(rows in prop::collection::vec(allocation_strategy(), 0..8)) {
            prop_assert_eq!(weighted_price(&rows, "entries"), weighted_price(&rows, "entries"));
        }
    }
}
