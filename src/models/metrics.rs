//! Derived metrics for a trade setup: distances, ratio and position size.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Distances between weighted entry and the stop / target levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distances {
    /// |weighted entry - stop-loss|
    pub stop_loss: Decimal,

    /// |weighted take-profit - weighted entry|
    pub take_profit: Decimal,

    /// Stop-loss distance as a fraction of weighted entry (0.1 = 10%)
    pub stop_loss_pct: Decimal,

    /// Take-profit distance as a fraction of weighted entry
    pub take_profit_pct: Decimal,
}

/// Position size derived from the amount at risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionSizing {
    /// Currency amount lost if the stop is hit (1R)
    pub one_r: Decimal,

    /// Notional position size
    pub position_size: Decimal,

    /// Collateral required at the chosen leverage
    pub margin: Decimal,
}

/// Everything the calculator derives from a setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupMetrics {
    pub weighted_entry: Decimal,
    pub weighted_take_profit: Decimal,
    pub distances: Distances,
    pub risk_reward_ratio: Decimal,
    pub sizing: PositionSizing,

    /// Units of the traded asset (position size / weighted entry)
    pub quantity: Decimal,
}
