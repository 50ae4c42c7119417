//! Checks that a set of allocations adds up to the whole position.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::fixed;
use super::translate::{localize, Translator};
use crate::models::{priced_total, Allocation, PercentScale};

/// Default tolerance in percentage points on the 0-100 scale.
pub const DEFAULT_ALLOCATION_TOLERANCE: Decimal = dec!(0.1);

/// Outcome of an allocation check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationCheck {
    pub valid: bool,

    /// Sum of percents over priced rows, on the 0-100 scale
    pub total: Decimal,

    pub errors: Vec<String>,
}

impl AllocationCheck {
    /// Total on the 0-1 scale, as the trade validator expects it.
    pub fn total_fraction(&self) -> Decimal {
        PercentScale::Percent.to_fraction(self.total)
    }
}

/// Check that allocations (percent on the 0-100 scale) sum to 100.
///
/// Only rows with a positive price count; a priced row with 0% still
/// contributes its 0. An all-empty set is reported valid with a total of
/// 0 because nothing has been entered yet. `tolerance` is in percentage
/// points.
///
/// # Example
///
/// 33.33 + 33.33 + 33.29 = 99.95, within the default 0.1 tolerance.
pub fn validate_allocation(
    allocations: &[Allocation],
    tolerance: Decimal,
    translator: Option<&dyn Translator>,
) -> AllocationCheck {
    let priced = allocations.iter().filter(|a| a.is_priced()).count();
    if priced == 0 {
        return AllocationCheck {
            valid: true,
            total: Decimal::ZERO,
            errors: Vec::new(),
        };
    }

    let total = priced_total(allocations);
    let valid = total.saturating_sub(dec!(100)).abs() <= tolerance;

    let mut errors = Vec::new();
    if !valid {
        let shown = fixed(total, 1);
        warn!(total = %total, "Allocation does not sum to 100%");
        errors.push(localize(
            translator,
            "validations.allocationTotal",
            &[("total", shown.clone())],
            || format!("Allocation ({shown}%) must equal 100%"),
        ));
    }

    AllocationCheck { valid, total, errors }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::translate::MessageParams;

    fn rows(pairs: &[(Decimal, Decimal)]) -> Vec<Allocation> {
        pairs.iter().map(|&(price, percent)| Allocation::new(price, percent)).collect()
    }

    #[test]
    fn test_empty_set_is_valid() {
        let check = validate_allocation(&[], DEFAULT_ALLOCATION_TOLERANCE, None);
        assert!(check.valid);
        assert_eq!(check.total, Decimal::ZERO);
        assert!(check.errors.is_empty());

        let placeholders = vec![Allocation::placeholder(), Allocation::new(Decimal::ZERO, dec!(40))];
        let check = validate_allocation(&placeholders, DEFAULT_ALLOCATION_TOLERANCE, None);
        assert!(check.valid);
        assert_eq!(check.total, Decimal::ZERO);
    }

    #[test]
    fn test_thirds_within_tolerance() {
        let entries = rows(&[
            (dec!(100), dec!(33.33)),
            (dec!(101), dec!(33.33)),
            (dec!(102), dec!(33.29)),
        ]);
        let check = validate_allocation(&entries, DEFAULT_ALLOCATION_TOLERANCE, None);
        assert!(check.valid);
        assert_eq!(check.total, dec!(99.95));
        assert!(check.errors.is_empty());
    }

    #[test]
    fn test_half_allocated() {
        let check = validate_allocation(&rows(&[(dec!(100), dec!(50))]), DEFAULT_ALLOCATION_TOLERANCE, None);
        assert!(!check.valid);
        assert_eq!(check.total, dec!(50));
        assert_eq!(check.errors, vec!["Allocation (50.0%) must equal 100%".to_string()]);
    }

    #[test]
    fn test_zero_percent_priced_row_counts() {
        // The 0% row is priced, so it is part of the (short) total
        let entries = rows(&[(dec!(100), dec!(99.8)), (dec!(101), Decimal::ZERO)]);
        let check = validate_allocation(&entries, DEFAULT_ALLOCATION_TOLERANCE, None);
        assert!(!check.valid);
        assert_eq!(check.errors, vec!["Allocation (99.8%) must equal 100%".to_string()]);
    }

    #[test]
    fn test_over_allocation_and_custom_tolerance() {
        let entries = rows(&[(dec!(100), dec!(60)), (dec!(101), dec!(40.5))]);
        assert!(!validate_allocation(&entries, DEFAULT_ALLOCATION_TOLERANCE, None).valid);
        assert!(validate_allocation(&entries, dec!(1), None).valid);
    }

    fn spanish(key: &str, params: &MessageParams<'_>) -> String {
        format!("{key}:{}", params[0].1)
    }

    #[test]
    fn test_huge_percents_saturate() {
        let rows = vec![
            Allocation::new(dec!(100), Decimal::MAX),
            Allocation::new(dec!(101), Decimal::MAX),
        ];
        let check = validate_allocation(&rows, DEFAULT_ALLOCATION_TOLERANCE, None);
        assert!(!check.valid);
        assert_eq!(check.total, Decimal::MAX);
        assert_eq!(check.errors.len(), 1);
    }

    #[test]
    fn test_translated_message() {
        let check = validate_allocation(&rows(&[(dec!(100), dec!(50))]), DEFAULT_ALLOCATION_TOLERANCE, Some(&spanish));
        assert_eq!(check.errors, vec!["validations.allocationTotal:50.0".to_string()]);
    }

    #[test]
    fn test_total_fraction_feeds_trade_scale() {
        let entries = rows(&[(dec!(100), dec!(25)), (dec!(110), dec!(75))]);
        let check = validate_allocation(&entries, DEFAULT_ALLOCATION_TOLERANCE, None);
        assert_eq!(check.total, dec!(100));
        assert_eq!(check.total_fraction(), dec!(1));
    }
}
