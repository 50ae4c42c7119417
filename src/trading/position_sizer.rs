//! Risk-based position sizing: size the position so hitting the stop loses 1R.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{checked_div, checked_mul, non_negative, CalcError};
use crate::models::PositionSizing;

/// Account-level inputs to sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskParameters {
    /// Portfolio value (> 0, checked by the form schema)
    pub portfolio_value: Decimal,

    /// Fraction of the portfolio risked per trade (0.01 = 1%)
    pub risk_percent: Decimal,

    /// Leverage multiplier (>= 1)
    pub leverage: u32,
}

/// Calculator for risk-based position sizes.
pub struct PositionSizer;

impl PositionSizer {
    /// 1R: the currency amount lost if the stop is hit.
    pub fn one_r(portfolio_value: Decimal, risk_percent: Decimal) -> Result<Decimal, CalcError> {
        checked_mul(portfolio_value, risk_percent, "1R")
    }

    /// Size a position from the account risk and stop distance.
    ///
    /// # Arguments
    /// * `params` - Portfolio value, risk fraction and leverage
    /// * `sl_distance_pct` - Stop-loss distance as a fraction of entry
    ///
    /// Ranges are not re-validated here; only arithmetic degeneracies
    /// (zero stop distance, zero leverage) are reported.
    pub fn calculate(params: &RiskParameters, sl_distance_pct: Decimal) -> Result<PositionSizing, CalcError> {
        let sl_distance_pct = non_negative("stop-loss distance percentage", sl_distance_pct)?;

        let one_r = Self::one_r(params.portfolio_value, params.risk_percent)?;
        let position_size = checked_div(one_r, sl_distance_pct, "position size")?;
        let margin = checked_div(position_size, Decimal::from(params.leverage), "margin")?;

        debug!(
            one_r = %one_r,
            position_size = %position_size,
            margin = %margin,
            leverage = params.leverage,
            "Sized position"
        );

        Ok(PositionSizing {
            one_r,
            position_size,
            margin,
        })
    }

    /// Units of the asset bought or sold for a notional size.
    pub fn quantity(position_size: Decimal, weighted_entry: Decimal) -> Result<Decimal, CalcError> {
        checked_div(position_size, weighted_entry, "quantity")
    }
}
