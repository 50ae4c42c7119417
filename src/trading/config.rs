//! Journal configuration.

use std::str::FromStr;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Tolerances and defaults applied when checking a trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalConfig {
    /// Allowed deviation of an entry allocation from 100, in percentage points
    pub allocation_tolerance: Decimal,

    /// Allowed deviation of the take-profit allocation from 1.0 (0-1 scale)
    pub take_profit_tolerance: Decimal,

    /// Minimum risk/reward when the form leaves it blank
    pub default_min_rr: Decimal,

    /// Highest leverage the trade validator accepts
    pub max_safe_leverage: u32,

    /// Fraction of portfolio risked per trade (0.01 = 1%)
    pub default_risk_percent: Decimal,

    /// Leverage used when none is given
    pub default_leverage: u32,

    /// Display currency
    pub currency: String,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            allocation_tolerance: dec!(0.1),   // +/-0.1 percentage points
            take_profit_tolerance: dec!(0.001), // +/-0.1%
            default_min_rr: dec!(2),
            max_safe_leverage: 20,
            default_risk_percent: dec!(0.01), // 1R = 1% of portfolio
            default_leverage: 1,
            currency: "USD".to_string(),
        }
    }
}

impl JournalConfig {
    /// Defaults overlaid with any `JOURNAL_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overlaid with the `JOURNAL_*` values `lookup` returns.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = parse_value::<Decimal>(&lookup, "JOURNAL_ALLOCATION_TOLERANCE")? {
            config.allocation_tolerance = v;
        }
        if let Some(v) = parse_value::<Decimal>(&lookup, "JOURNAL_TP_TOLERANCE")? {
            config.take_profit_tolerance = v;
        }
        if let Some(v) = parse_value::<Decimal>(&lookup, "JOURNAL_MIN_RR")? {
            config.default_min_rr = v;
        }
        if let Some(v) = parse_value::<u32>(&lookup, "JOURNAL_MAX_SAFE_LEVERAGE")? {
            config.max_safe_leverage = v;
        }
        if let Some(v) = parse_value::<Decimal>(&lookup, "JOURNAL_RISK_PERCENT")? {
            config.default_risk_percent = v;
        }
        if let Some(v) = parse_value::<u32>(&lookup, "JOURNAL_DEFAULT_LEVERAGE")? {
            config.default_leverage = v;
        }
        if let Some(currency) = lookup("JOURNAL_CURRENCY") {
            config.currency = currency;
        }

        Ok(config)
    }
}

fn parse_value<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .with_context(|| format!("Invalid {name}: {raw}")),
        None => Ok(None),
    }
}
