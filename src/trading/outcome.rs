//! Realized outcome of recorded exits, expressed in currency and in R.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::distance::stop_loss_distance;
use super::error::{checked_add, checked_div, checked_mul, CalcError};
use crate::models::{Allocation, PositionSizing, PositionType};

/// Signed reward of one exit in units of the initial risk.
///
/// Positive when the exit is on the profitable side for the direction,
/// -1 at the stop, 0 at break-even.
pub fn exit_r_multiple(
    entry: Decimal,
    stop_loss: Decimal,
    exit_price: Decimal,
    position_type: PositionType,
) -> Result<Decimal, CalcError> {
    let risk = stop_loss_distance(entry, stop_loss);
    checked_div(position_type.sign() * (exit_price - entry), risk, "exit R multiple")
}

/// Aggregate of all exits recorded for a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitSummary {
    /// Share of the position closed so far (0-1)
    pub closed_percent: Decimal,

    /// Sum of percent * R over exits
    pub weighted_rr: Decimal,

    /// Realized profit/loss in currency
    pub pnl: Decimal,

    /// Realized profit/loss in R
    pub pnl_in_r: Decimal,
}

/// Summarize exits (percent on the 0-1 scale) against the planned setup.
///
/// Rows without a price are skipped as placeholders.
pub fn summarize_exits(
    exits: &[Allocation],
    entry: Decimal,
    stop_loss: Decimal,
    position_type: PositionType,
    sizing: &PositionSizing,
) -> Result<ExitSummary, CalcError> {
    let mut summary = ExitSummary {
        closed_percent: Decimal::ZERO,
        weighted_rr: Decimal::ZERO,
        pnl: Decimal::ZERO,
        pnl_in_r: Decimal::ZERO,
    };

    for exit in exits.iter().filter(|e| e.is_priced()) {
        let r = exit_r_multiple(entry, stop_loss, exit.price, position_type)?;
        let move_pct = checked_div(position_type.sign() * (exit.price - entry), entry, "exit move")?;
        let closed = checked_mul(sizing.position_size, exit.percent, "exit P&L")?;

        summary.closed_percent = checked_add(summary.closed_percent, exit.percent, "closed percent")?;
        summary.weighted_rr = checked_add(
            summary.weighted_rr,
            checked_mul(exit.percent, r, "exit R")?,
            "exit R",
        )?;
        summary.pnl = checked_add(summary.pnl, checked_mul(closed, move_pct, "exit P&L")?, "exit P&L")?;
    }

    summary.pnl_in_r = checked_div(summary.pnl, sizing.one_r, "P&L in R")?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sizing() -> PositionSizing {
        // 1R = 100 with a 10% stop
        PositionSizing {
            one_r: dec!(100),
            position_size: dec!(1000),
            margin: dec!(100),
        }
    }

    #[test]
    fn test_r_multiple_by_direction() {
        assert_eq!(exit_r_multiple(dec!(100), dec!(90), dec!(130), PositionType::Long), Ok(dec!(3)));
        assert_eq!(exit_r_multiple(dec!(100), dec!(90), dec!(90), PositionType::Long), Ok(dec!(-1)));
        assert_eq!(exit_r_multiple(dec!(100), dec!(110), dec!(80), PositionType::Short), Ok(dec!(2)));
        assert_eq!(exit_r_multiple(dec!(100), dec!(110), dec!(100), PositionType::Short), Ok(Decimal::ZERO));
    }

    #[test]
    fn test_summary_partial_close() {
        let exits = vec![
            Allocation::new(dec!(120), dec!(0.5)), // +2R on half
            Allocation::new(dec!(100), dec!(0.25)), // break-even on a quarter
        ];
        let summary = summarize_exits(&exits, dec!(100), dec!(90), PositionType::Long, &sizing()).unwrap();
        assert_eq!(summary.closed_percent, dec!(0.75));
        assert_eq!(summary.weighted_rr, dec!(1));
        assert_eq!(summary.pnl, dec!(100));
        assert_eq!(summary.pnl_in_r, dec!(1));
    }

    #[test]
    fn test_summary_overflow_is_reported() {
        let huge = PositionSizing {
            one_r: dec!(100),
            position_size: Decimal::MAX,
            margin: Decimal::MAX,
        };
        let exits = vec![Allocation::new(dec!(1e27), dec!(1))];
        assert_eq!(
            summarize_exits(&exits, dec!(100), dec!(90), PositionType::Long, &huge),
            Err(CalcError::Overflow { context: "exit P&L" })
        );
    }

    #[test]
    fn test_summary_stopped_out() {
        let exits = vec![Allocation::new(dec!(90), dec!(1)), Allocation::placeholder()];
        let summary = summarize_exits(&exits, dec!(100), dec!(90), PositionType::Long, &sizing()).unwrap();
        assert_eq!(summary.pnl, dec!(-100));
        assert_eq!(summary.pnl_in_r, dec!(-1));
    }
}
