//! Business-rule validation: allocation totals and trade acceptance.
//!
//! Failures are returned as data so a form can show every problem at
//! once; nothing here returns `Err`.

mod allocation;
mod trade;
mod translate;

use rust_decimal::{Decimal, RoundingStrategy};

pub use allocation::{validate_allocation, AllocationCheck, DEFAULT_ALLOCATION_TOLERANCE};
pub use trade::{validate_trade, TradeCheck, TradeValidator, ValidationResult, DEFAULT_TAKE_PROFIT_TOLERANCE};
pub use translate::{Message, MessageCatalog, MessageParams, Translator};

/// Fixed-point text with exactly `dp` decimals, half away from zero.
pub(crate) fn fixed(value: Decimal, dp: u32) -> String {
    let mut rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(dp);
    rounded.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_fixed() {
        assert_eq!(fixed(dec!(1.5), 2), "1.50");
        assert_eq!(fixed(dec!(50), 1), "50.0");
        assert_eq!(fixed(dec!(99.95), 1), "100.0");
        assert_eq!(fixed(dec!(2.345), 2), "2.35");
        assert_eq!(fixed(dec!(89.6), 0), "90");
    }
}
