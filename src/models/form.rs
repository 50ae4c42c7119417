//! Raw form input as typed in by the user, before structural validation.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Allocation, PositionType};

/// Planned take-profit on the trade form (percent on the 0-1 scale).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedTakeProfit {
    pub price: Decimal,
    pub percent: Decimal,
    #[serde(default)]
    pub rr: Decimal,
}

impl PlannedTakeProfit {
    pub fn allocation(&self) -> Allocation {
        Allocation::new(self.price, self.percent)
    }
}

/// Kind of exit recorded against a closed or partially closed trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitType {
    #[serde(rename = "TP1")]
    Tp1,
    #[serde(rename = "TP2")]
    Tp2,
    #[serde(rename = "TP3")]
    Tp3,
    #[serde(rename = "TP4")]
    Tp4,
    #[serde(rename = "BE")]
    BreakEven,
    #[serde(rename = "SL")]
    StopLoss,
}

impl ExitType {
    /// Wire names accepted on the form.
    pub const NAMES: &'static [&'static str] = &["TP1", "TP2", "TP3", "TP4", "BE", "SL"];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExitType::Tp1 => "TP1",
            ExitType::Tp2 => "TP2",
            ExitType::Tp3 => "TP3",
            ExitType::Tp4 => "TP4",
            ExitType::BreakEven => "BE",
            ExitType::StopLoss => "SL",
        }
    }
}

impl fmt::Display for ExitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExitType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TP1" => Ok(ExitType::Tp1),
            "TP2" => Ok(ExitType::Tp2),
            "TP3" => Ok(ExitType::Tp3),
            "TP4" => Ok(ExitType::Tp4),
            "BE" => Ok(ExitType::BreakEven),
            "SL" => Ok(ExitType::StopLoss),
            other => Err(format!("unknown exit type: {other}")),
        }
    }
}

/// Recorded exit (percent on the 0-1 scale).
///
/// The type is kept as text so an unknown value is reported by the form
/// schema next to the field instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exit {
    #[serde(rename = "type")]
    pub exit_type: String,
    pub price: Decimal,
    pub percent: Decimal,
    #[serde(default)]
    pub rr: Decimal,
    #[serde(default)]
    pub pnl: Decimal,
}

impl Exit {
    pub fn kind(&self) -> Option<ExitType> {
        self.exit_type.parse().ok()
    }

    pub fn allocation(&self) -> Allocation {
        Allocation::new(self.price, self.percent)
    }
}

/// Trade entry form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeForm {
    /// Trading pair, e.g. BTC/USDT
    pub pair: String,

    /// Exchange the trade is placed on
    pub exchange: String,

    pub analysis_date: NaiveDate,
    pub trade_date: NaiveDate,

    /// Portfolio value at analysis time
    pub portfolio_value: Decimal,

    /// Fraction of the portfolio risked (0.01 = 1%)
    pub r_percent: Decimal,

    /// Minimum acceptable risk/reward ratio
    pub min_rr: Decimal,

    /// Planned entry price
    pub planned_pe: Decimal,

    /// Planned stop-loss price
    pub planned_sl: Decimal,

    /// Leverage as typed; must be a whole number
    pub leverage: Decimal,

    /// Planned take-profits (0-1 scale)
    pub planned_tps: Vec<PlannedTakeProfit>,

    /// Scaled entries from the entry editor (0-100 scale)
    #[serde(default)]
    pub planned_entries: Option<Vec<Allocation>>,

    /// Direction; inferred from stop-loss vs entry when absent
    #[serde(default)]
    pub position_type: Option<PositionType>,

    #[serde(default)]
    pub notes: Option<String>,

    #[serde(default)]
    pub effective_pe: Option<Decimal>,

    #[serde(default)]
    pub close_date: Option<NaiveDate>,

    #[serde(default)]
    pub exits: Option<Vec<Exit>>,
}

/// Quick calculator form: one entry, one stop, one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculatorForm {
    pub portfolio: Decimal,
    pub r_percent: Decimal,
    pub min_rr: Decimal,
    pub pe: Decimal,
    pub sl: Decimal,
    pub tp: Decimal,
    pub leverage: Decimal,
}

/// User defaults applied to new trades.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsForm {
    pub initial_capital: Decimal,
    pub current_r_percent: Decimal,
    pub default_min_rr: Decimal,
    pub default_leverage: Decimal,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "USD".to_string()
}
