//! Stop-loss / take-profit distances and the risk/reward ratio.
//!
//! Distances are magnitudes. Direction never flips their sign; it only
//! decides which side of the entry is risk and which is reward when the
//! setup is drawn (see [`super::layout`]).

use rust_decimal::Decimal;
use tracing::debug;

use super::error::{checked_add, checked_div, non_negative, CalcError};
use crate::models::Distances;

/// |weighted entry - stop-loss|
pub fn stop_loss_distance(weighted_entry: Decimal, stop_loss: Decimal) -> Decimal {
    (weighted_entry - stop_loss).abs()
}

/// |weighted take-profit - weighted entry|
pub fn take_profit_distance(weighted_entry: Decimal, weighted_take_profit: Decimal) -> Decimal {
    (weighted_take_profit - weighted_entry).abs()
}

/// Reward per unit of risk: take-profit distance / stop-loss distance.
///
/// A zero stop-loss distance (stop equal to entry) is reported as
/// [`CalcError::DivisionByZero`]; the form schema rejects that setup
/// before it gets here.
pub fn risk_reward_ratio(sl_distance: Decimal, tp_distance: Decimal) -> Result<Decimal, CalcError> {
    let sl_distance = non_negative("stop-loss distance", sl_distance)?;
    let tp_distance = non_negative("take-profit distance", tp_distance)?;
    checked_div(tp_distance, sl_distance, "risk/reward ratio")
}

/// Distance as a decimal fraction of the weighted entry (not x100).
pub fn distance_percentage(distance: Decimal, weighted_entry: Decimal) -> Result<Decimal, CalcError> {
    let distance = non_negative("distance", distance)?;
    checked_div(distance, weighted_entry, "distance percentage")
}

/// Compute all distances for a weighted entry, stop and weighted target.
pub fn distances(
    weighted_entry: Decimal,
    stop_loss: Decimal,
    weighted_take_profit: Decimal,
) -> Result<Distances, CalcError> {
    let sl = stop_loss_distance(weighted_entry, stop_loss);
    let tp = take_profit_distance(weighted_entry, weighted_take_profit);

    let result = Distances {
        stop_loss: sl,
        take_profit: tp,
        stop_loss_pct: distance_percentage(sl, weighted_entry)?,
        take_profit_pct: distance_percentage(tp, weighted_entry)?,
    };

    debug!(
        entry = %weighted_entry,
        sl_distance = %result.stop_loss,
        tp_distance = %result.take_profit,
        "Computed setup distances"
    );
    Ok(result)
}

/// Share of a risk/reward bar given to each side. Display weights only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisualShares {
    pub stop_loss: Decimal,
    pub take_profit: Decimal,
}

impl VisualShares {
    /// `sl / (sl + tp)` and its complement.
    pub fn new(sl_distance: Decimal, tp_distance: Decimal) -> Result<Self, CalcError> {
        let sl_distance = non_negative("stop-loss distance", sl_distance)?;
        let tp_distance = non_negative("take-profit distance", tp_distance)?;
        let total = checked_add(sl_distance, tp_distance, "visual shares")?;
        let stop_loss = checked_div(sl_distance, total, "visual shares")?;
        Ok(Self {
            stop_loss,
            take_profit: Decimal::ONE - stop_loss,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_long_setup_ratio() {
        let d = distances(dec!(100), dec!(90), dec!(130)).unwrap();
        assert_eq!(d.stop_loss, dec!(10));
        assert_eq!(d.take_profit, dec!(30));
        assert_eq!(risk_reward_ratio(d.stop_loss, d.take_profit), Ok(dec!(3)));
        assert_eq!(d.stop_loss_pct, dec!(0.1));
        assert_eq!(d.take_profit_pct, dec!(0.3));
    }

    #[test]
    fn test_short_setup_distances_stay_positive() {
        let d = distances(dec!(100), dec!(105), dec!(85)).unwrap();
        assert_eq!(d.stop_loss, dec!(5));
        assert_eq!(d.take_profit, dec!(15));
        assert_eq!(risk_reward_ratio(d.stop_loss, d.take_profit), Ok(dec!(3)));
    }

    #[test]
    fn test_stop_at_entry_is_degenerate() {
        let d = distances(dec!(100), dec!(100), dec!(130)).unwrap();
        assert_eq!(d.stop_loss, Decimal::ZERO);
        assert_eq!(
            risk_reward_ratio(d.stop_loss, d.take_profit),
            Err(CalcError::DivisionByZero { context: "risk/reward ratio" })
        );
    }

    #[test]
    fn test_zero_entry_is_degenerate() {
        assert!(matches!(
            distances(Decimal::ZERO, dec!(90), dec!(130)),
            Err(CalcError::DivisionByZero { .. })
        ));
    }

    #[test]
    fn test_negative_distance_is_rejected() {
        assert!(matches!(
            risk_reward_ratio(dec!(-10), dec!(30)),
            Err(CalcError::NegativeInput { .. })
        ));
        assert!(matches!(
            distance_percentage(dec!(-1), dec!(100)),
            Err(CalcError::NegativeInput { .. })
        ));
    }

    #[test]
    fn test_visual_shares() {
        let shares = VisualShares::new(dec!(10), dec!(30)).unwrap();
        assert_eq!(shares.stop_loss, dec!(0.25));
        assert_eq!(shares.take_profit, dec!(0.75));
        assert!(VisualShares::new(Decimal::ZERO, Decimal::ZERO).is_err());
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let first = distances(dec!(101.37), dec!(97.2), dec!(113.05));
        let second = distances(dec!(101.37), dec!(97.2), dec!(113.05));
        assert_eq!(first, second);
    }
}
