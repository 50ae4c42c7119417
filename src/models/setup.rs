//! Trade setup: entries, stop-loss and take-profits for one position.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Allocation;

/// Direction of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PositionType {
    Long,
    Short,
}

impl PositionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PositionType::Long => "LONG",
            PositionType::Short => "SHORT",
        }
    }

    /// Infer direction from where the stop sits relative to entry.
    ///
    /// Returns `None` when the stop equals the entry.
    pub fn infer(entry: Decimal, stop_loss: Decimal) -> Option<Self> {
        match stop_loss.cmp(&entry) {
            std::cmp::Ordering::Less => Some(PositionType::Long),
            std::cmp::Ordering::Greater => Some(PositionType::Short),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// +1 for long, -1 for short: the sign of a favourable price move.
    pub fn sign(&self) -> Decimal {
        match self {
            PositionType::Long => Decimal::ONE,
            PositionType::Short => Decimal::NEGATIVE_ONE,
        }
    }
}

impl fmt::Display for PositionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PositionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "long" => Ok(PositionType::Long),
            "short" => Ok(PositionType::Short),
            other => Err(format!("unknown position type: {other}")),
        }
    }
}

/// Price level drawn around the entry line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Level {
    TakeProfit,
    StopLoss,
}

impl Level {
    pub fn label(&self) -> &'static str {
        match self {
            Level::TakeProfit => "TP",
            Level::StopLoss => "SL",
        }
    }
}

/// Everything needed to derive a setup's metrics.
///
/// Weighted prices, distances and ratios are derived on demand and never
/// stored here, so a setup may hold transient invalid states while it is
/// being edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeSetup {
    /// Entry fills (any percent scale; weighting re-normalizes)
    pub entries: Vec<Allocation>,

    /// Stop-loss price
    pub stop_loss: Decimal,

    /// Take-profit fills (any percent scale; weighting re-normalizes)
    pub take_profits: Vec<Allocation>,

    /// Long or short
    pub position_type: PositionType,
}

impl TradeSetup {
    pub fn new(
        entries: Vec<Allocation>,
        stop_loss: Decimal,
        take_profits: Vec<Allocation>,
        position_type: PositionType,
    ) -> Self {
        Self {
            entries,
            stop_loss,
            take_profits,
            position_type,
        }
    }

    /// Number of entry rows that carry weight.
    pub fn weighted_entry_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_weighted()).count()
    }

    /// Number of take-profit rows that carry weight.
    pub fn weighted_take_profit_count(&self) -> usize {
        self.take_profits.iter().filter(|tp| tp.is_weighted()).count()
    }
}
