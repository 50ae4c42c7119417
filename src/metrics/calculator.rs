//! Metrics pipeline: weighted prices, distances, ratio and position size
//! for a trade setup, and the full review of a submitted trade form.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use tracing::{debug, info};

use crate::models::{priced_total, Allocation, CalculatorForm, PositionType, SetupMetrics, TradeForm, TradeSetup};
use crate::schema::{validate_trade_form, SchemaReport};
use crate::trading::{
    distances, risk_reward_ratio, summarize_exits, weighted_price, CalcError, ExitSummary, JournalConfig,
    PositionSizer, RiskParameters, SetupLayout,
};
use crate::validation::{validate_allocation, AllocationCheck, TradeCheck, TradeValidator, Translator, ValidationResult};

/// Calculator for trade setup metrics.
pub struct SetupCalculator;

impl SetupCalculator {
    /// Derive every metric for a setup.
    ///
    /// Fails with a [`CalcError`] while the setup is not yet computable
    /// (no filled-in entry or target rows, stop equal to entry) or when a
    /// price is too large for Decimal arithmetic.
    pub fn calculate(setup: &TradeSetup, params: &RiskParameters) -> Result<SetupMetrics, CalcError> {
        let weighted_entry = weighted_price(&setup.entries, "entries")?;
        let weighted_take_profit = weighted_price(&setup.take_profits, "take-profits")?;

        let distances = distances(weighted_entry, setup.stop_loss, weighted_take_profit)?;
        let risk_reward_ratio = risk_reward_ratio(distances.stop_loss, distances.take_profit)?;
        let sizing = PositionSizer::calculate(params, distances.stop_loss_pct)?;
        let quantity = PositionSizer::quantity(sizing.position_size, weighted_entry)?;

        debug!(
            entry = %weighted_entry,
            take_profit = %weighted_take_profit,
            rr = %risk_reward_ratio,
            "Calculated setup metrics"
        );

        Ok(SetupMetrics {
            weighted_entry,
            weighted_take_profit,
            distances,
            risk_reward_ratio,
            sizing,
            quantity,
        })
    }

    /// Direction-aware placement of the computed levels.
    pub fn layout(setup: &TradeSetup, metrics: &SetupMetrics) -> Result<SetupLayout, CalcError> {
        SetupLayout::new(
            setup.position_type,
            metrics.weighted_entry,
            setup.stop_loss,
            metrics.weighted_take_profit,
            setup.weighted_entry_count(),
            setup.weighted_take_profit_count(),
        )
    }
}

/// Outcome of every stage a submitted trade form goes through.
#[derive(Debug, Clone, Serialize)]
pub struct TradeReview {
    /// Structural issues; later stages only run when this is clean
    pub schema: SchemaReport,

    pub setup: Option<TradeSetup>,

    pub metrics: Option<SetupMetrics>,

    /// Why metrics could not be derived
    #[serde(serialize_with = "serialize_calc_error")]
    pub not_computable: Option<CalcError>,

    /// Planned entry allocation check, when scaled entries were given
    pub entry_allocation: Option<AllocationCheck>,

    pub validation: Option<ValidationResult>,

    /// Realized outcome of recorded exits
    pub exits: Option<ExitSummary>,
}

fn serialize_calc_error<S>(error: &Option<CalcError>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match error {
        Some(e) => serializer.serialize_some(&e.to_string()),
        None => serializer.serialize_none(),
    }
}

impl TradeReview {
    fn rejected(schema: SchemaReport) -> Self {
        Self {
            schema,
            setup: None,
            metrics: None,
            not_computable: None,
            entry_allocation: None,
            validation: None,
            exits: None,
        }
    }

    /// True only when every stage ran and passed.
    pub fn accepted(&self) -> bool {
        self.schema.is_valid()
            && self.metrics.is_some()
            && self.entry_allocation.as_ref().map_or(true, |a| a.valid)
            && self.validation.as_ref().is_some_and(|v| v.valid)
    }

    /// Every human-readable problem, schema issues first.
    pub fn errors(&self) -> Vec<String> {
        let mut errors: Vec<String> = self
            .schema
            .issues()
            .iter()
            .map(|i| format!("{}: {}", i.path, i.message))
            .collect();
        if let Some(e) = &self.not_computable {
            errors.push(e.to_string());
        }
        if let Some(a) = &self.entry_allocation {
            errors.extend(a.errors.iter().cloned());
        }
        if let Some(v) = &self.validation {
            errors.extend(v.errors.iter().cloned());
        }
        errors
    }
}

/// Build the setup a validated form describes.
///
/// Scaled entries are used when at least one row is filled in; otherwise
/// the planned entry carries the whole position.
pub fn setup_from_form(form: &TradeForm) -> TradeSetup {
    let entries = match &form.planned_entries {
        Some(rows) if rows.iter().any(Allocation::is_weighted) => rows.clone(),
        _ => vec![Allocation::new(form.planned_pe, dec!(100))],
    };
    let take_profits = form.planned_tps.iter().map(|tp| tp.allocation()).collect();

    // Stop equal to entry has no direction; the ratio step reports it
    let position_type = form
        .position_type
        .or_else(|| PositionType::infer(form.planned_pe, form.planned_sl))
        .unwrap_or(PositionType::Long);

    TradeSetup::new(entries, form.planned_sl, take_profits, position_type)
}

/// Quick-calculator form for a multi-fill setup, with the weighted entry
/// and target standing in for the single prices.
///
/// A side with no filled-in rows reads as 0 so the positive-price rule
/// reports it.
pub fn calculator_form(
    entries: &[Allocation],
    stop_loss: Decimal,
    take_profits: &[Allocation],
    params: &RiskParameters,
    min_rr: Decimal,
) -> Result<CalculatorForm, CalcError> {
    let weighted_or_zero = |rows: &[Allocation], set| match weighted_price(rows, set) {
        Err(CalcError::EmptyAllocation { .. }) => Ok(Decimal::ZERO),
        other => other,
    };

    Ok(CalculatorForm {
        portfolio: params.portfolio_value,
        r_percent: params.risk_percent,
        min_rr,
        pe: weighted_or_zero(entries, "entries")?,
        sl: stop_loss,
        tp: weighted_or_zero(take_profits, "take-profits")?,
        leverage: Decimal::from(params.leverage),
    })
}

/// Run a trade form through schema, metrics and trade validation.
pub fn review_trade(
    form: &TradeForm,
    config: &JournalConfig,
    translator: Option<&dyn Translator>,
) -> TradeReview {
    let schema = validate_trade_form(form, translator);
    if !schema.is_valid() {
        info!(pair = %form.pair, issues = schema.issues().len(), "Trade form has structural issues");
        return TradeReview::rejected(schema);
    }

    let setup = setup_from_form(form);
    let params = RiskParameters {
        portfolio_value: form.portfolio_value,
        risk_percent: form.r_percent,
        leverage: form.leverage.to_u32().unwrap_or(config.default_leverage),
    };

    let entry_allocation = form
        .planned_entries
        .as_ref()
        .map(|rows| validate_allocation(rows, config.allocation_tolerance, translator));

    let mut review = TradeReview {
        entry_allocation,
        ..TradeReview::rejected(schema)
    };

    let metrics = match SetupCalculator::calculate(&setup, &params) {
        Ok(metrics) => metrics,
        Err(e) => {
            info!(pair = %form.pair, reason = %e, "Trade metrics not computable");
            review.not_computable = Some(e);
            review.setup = Some(setup);
            return review;
        }
    };

    let check = TradeCheck {
        risk_reward_ratio: metrics.risk_reward_ratio,
        min_risk_reward: form.min_rr,
        leverage: params.leverage,
        max_leverage: config.max_safe_leverage,
        total_take_profit_percent: priced_total(&setup.take_profits),
    };
    review.validation = Some(TradeValidator::new(config.take_profit_tolerance).validate(&check, translator));

    if let Some(exits) = form.exits.as_ref().filter(|e| !e.is_empty()) {
        let rows: Vec<Allocation> = exits.iter().map(|e| e.allocation()).collect();
        let entry = form.effective_pe.unwrap_or(metrics.weighted_entry);
        match summarize_exits(&rows, entry, setup.stop_loss, setup.position_type, &metrics.sizing) {
            Ok(summary) => review.exits = Some(summary),
            Err(e) => debug!(reason = %e, "Exit summary not computable"),
        }
    }

    review.metrics = Some(metrics);
    review.setup = Some(setup);

    if review.accepted() {
        info!(pair = %form.pair, rr = %metrics.risk_reward_ratio, "Trade accepted");
    }
    review
}

/// Risk/reward of a single take-profit level against the planned setup.
pub fn take_profit_rr(entry: Decimal, stop_loss: Decimal, take_profit: Decimal) -> Result<Decimal, CalcError> {
    risk_reward_ratio((entry - stop_loss).abs(), (take_profit - entry).abs())
}
