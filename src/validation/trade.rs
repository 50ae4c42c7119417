//! Business-rule checks run before a trade is accepted.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::fixed;
use super::translate::{localize, Translator};

/// Default tolerance on the take-profit total (0-1 scale).
pub const DEFAULT_TAKE_PROFIT_TOLERANCE: Decimal = dec!(0.001);

/// Inputs to the trade checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeCheck {
    /// Planned weighted risk/reward ratio
    pub risk_reward_ratio: Decimal,

    /// Minimum acceptable ratio
    pub min_risk_reward: Decimal,

    pub leverage: u32,

    /// Highest leverage considered safe
    pub max_leverage: u32,

    /// Sum of take-profit allocations on the 0-1 scale (NOT 0-100)
    pub total_take_profit_percent: Decimal,
}

/// Accept/reject decision with every reason for rejection.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// Runs the risk/reward, leverage and take-profit allocation checks.
#[derive(Debug, Clone)]
pub struct TradeValidator {
    take_profit_tolerance: Decimal,
}

impl Default for TradeValidator {
    fn default() -> Self {
        Self::new(DEFAULT_TAKE_PROFIT_TOLERANCE)
    }
}

impl TradeValidator {
    pub fn new(take_profit_tolerance: Decimal) -> Self {
        Self { take_profit_tolerance }
    }

    /// Run all checks. Every failure is reported, always in the order
    /// risk/reward, leverage, take-profit allocation.
    pub fn validate(&self, trade: &TradeCheck, translator: Option<&dyn Translator>) -> ValidationResult {
        let mut errors = Vec::new();

        // RR check
        if trade.risk_reward_ratio < trade.min_risk_reward {
            let rr = fixed(trade.risk_reward_ratio, 2);
            let min = trade.min_risk_reward.normalize().to_string();
            errors.push(localize(
                translator,
                "validations.rrBelowMinimum",
                &[("rr", rr.clone()), ("min", min.clone())],
                || format!("RR ({rr}) is below minimum ({min})"),
            ));
        }

        // Leverage check
        if trade.leverage > trade.max_leverage {
            let (leverage, max) = (trade.leverage, trade.max_leverage);
            errors.push(localize(
                translator,
                "validations.leverageExceedsMax",
                &[("leverage", leverage.to_string()), ("max", max.to_string())],
                || format!("Leverage ({leverage}x) exceeds max safe leverage ({max}x)"),
            ));
        }

        // TP allocation check
        if trade.total_take_profit_percent.saturating_sub(Decimal::ONE).abs() > self.take_profit_tolerance {
            let total = fixed(trade.total_take_profit_percent.saturating_mul(dec!(100)), 0);
            errors.push(localize(
                translator,
                "validations.tpAllocationTotal",
                &[("total", total.clone())],
                || format!("TP allocation ({total}%) must equal 100%"),
            ));
        }

        if !errors.is_empty() {
            warn!(count = errors.len(), rr = %trade.risk_reward_ratio, "Trade rejected");
        }

        ValidationResult::from_errors(errors)
    }
}

/// Check a trade with the default take-profit tolerance.
pub fn validate_trade(trade: &TradeCheck, translator: Option<&dyn Translator>) -> ValidationResult {
    TradeValidator::default().validate(trade, translator)
}
