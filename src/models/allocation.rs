//! Allocation model: one partial entry or exit fill as a (price, percent) pair.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// A single partial fill: price and the share of the position it carries.
///
/// The percent scale depends on where the allocation lives: entry rows
/// edited by hand use 0-100, planned take-profits and exits use 0-1.
/// See [`PercentScale`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Allocation {
    /// Fill price (all prices share one unit)
    pub price: Decimal,

    /// Share of the position at this price
    pub percent: Decimal,
}

impl Allocation {
    pub fn new(price: Decimal, percent: Decimal) -> Self {
        Self { price, percent }
    }

    /// Empty row used as a placeholder in editable lists.
    pub fn placeholder() -> Self {
        Self::default()
    }

    /// True if this row contributes to a weighted price.
    ///
    /// Rows with a non-positive price or percent are placeholders or
    /// half-typed input and are skipped rather than rejected.
    pub fn is_weighted(&self) -> bool {
        self.price > Decimal::ZERO && self.percent > Decimal::ZERO
    }

    /// True if this row has a usable price, regardless of its percent.
    pub fn is_priced(&self) -> bool {
        self.price > Decimal::ZERO
    }
}

/// Which field of an allocation row to edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationField {
    Price,
    Percent,
}

/// Scale a percentage is expressed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PercentScale {
    /// 0 to 100
    Percent,
    /// 0 to 1
    Fraction,
}

impl PercentScale {
    /// Value representing "the whole position" on this scale.
    pub fn whole(&self) -> Decimal {
        match self {
            PercentScale::Percent => dec!(100),
            PercentScale::Fraction => Decimal::ONE,
        }
    }

    /// Convert a value on this scale to the 0-1 scale.
    pub fn to_fraction(&self, value: Decimal) -> Decimal {
        match self {
            PercentScale::Percent => value / dec!(100),
            PercentScale::Fraction => value,
        }
    }

    /// Convert a 0-1 value to this scale.
    pub fn from_fraction(&self, fraction: Decimal) -> Decimal {
        match self {
            PercentScale::Percent => fraction.saturating_mul(dec!(100)),
            PercentScale::Fraction => fraction,
        }
    }

    /// Re-express every allocation from this scale on `target`.
    pub fn convert(&self, allocations: &[Allocation], target: PercentScale) -> Vec<Allocation> {
        allocations
            .iter()
            .map(|a| Allocation::new(a.price, target.from_fraction(self.to_fraction(a.percent))))
            .collect()
    }
}

/// Sum of percents over rows with a usable price, saturating at the
/// Decimal range.
pub fn priced_total(allocations: &[Allocation]) -> Decimal {
    allocations
        .iter()
        .filter(|a| a.is_priced())
        .fold(Decimal::ZERO, |total, a| total.saturating_add(a.percent))
}
