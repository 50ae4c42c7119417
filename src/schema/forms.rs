//! Schemas for the trade, calculator and settings forms.

use std::sync::OnceLock;

use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::report::SchemaReport;
use super::rules::{Constraint, FieldSpec, FieldValue, Schema};
use crate::models::{CalculatorForm, ExitType, SettingsForm, TradeForm};
use crate::validation::{Message, Translator};

pub const MIN_LEVERAGE: u32 = 1;
pub const MAX_LEVERAGE: u32 = 125;
pub const MIN_R_PERCENT: Decimal = dec!(0.001);
pub const MAX_R_PERCENT: Decimal = Decimal::ONE;
pub const MIN_TAKE_PROFITS: usize = 1;
pub const MAX_TAKE_PROFITS: usize = 4;
/// Smallest take-profit or exit share (0-1 scale). Inclusive: a share of
/// exactly 0.01 passes, so the accepted range is `[0.01, 1]`.
pub const MIN_ALLOCATION_PERCENT: Decimal = dec!(0.01);

const PAIR_REQUIRED: Message = Message::new("validations.pairRequired", "Trading pair is required");
const PAIR_FORMAT: Message = Message::new("validations.pairFormat", "Must be in format BTC/USDT");
const EXCHANGE_REQUIRED: Message = Message::new("validations.exchangeRequired", "Exchange is required");
const PORTFOLIO_POSITIVE: Message =
    Message::new("validations.portfolioMustBePositive", "Portfolio value must be positive");
const CALC_PORTFOLIO_POSITIVE: Message =
    Message::new("validations.portfolioMustBePositive", "Portfolio must be positive");
const CAPITAL_POSITIVE: Message =
    Message::new("validations.portfolioMustBePositive", "Initial capital must be positive");
const R_PERCENT_MIN: Message = Message::new("validations.rPercentMin", "R% must be at least 0.1%");
const R_PERCENT_MAX: Message = Message::new("validations.rPercentMax", "R% cannot exceed 100%");
const MIN_RR_POSITIVE: Message = Message::new("validations.minRRMustBePositive", "Minimum RR must be positive");
const ENTRY_POSITIVE: Message = Message::new("validations.entryMustBePositive", "Entry price must be positive");
const STOP_POSITIVE: Message = Message::new("validations.priceMustBePositive", "Stop loss must be positive");
const PRICE_POSITIVE: Message = Message::new("validations.priceMustBePositive", "Price must be positive");
const TP_POSITIVE: Message = Message::new("validations.tpMustBePositive", "Take profit must be positive");
const LEVERAGE_INTEGER: Message = Message::new("validations.leverageInteger", "Leverage must be a whole number");
const LEVERAGE_MIN: Message = Message::new("validations.leverageMin", "Leverage must be at least 1x");
const LEVERAGE_MAX: Message = Message::new("validations.leverageMax", "Leverage cannot exceed 125x");
const AT_LEAST_ONE_TP: Message = Message::new("validations.atLeastOneTP", "At least one take profit is required");
const MAX_FOUR_TPS: Message = Message::new("validations.maxFourTPs", "Maximum 4 take profits allowed");
const PERCENT_RANGE: Message = Message::new("validations.percentRange", "Percent must be between 1% and 100%");
const PRICE_NOT_NEGATIVE: Message = Message::new("validations.priceNotNegative", "Price cannot be negative");
const PERCENT_NOT_NEGATIVE: Message = Message::new("validations.percentNotNegative", "Percent cannot be negative");
const EXIT_TYPE: Message =
    Message::new("validations.exitTypeInvalid", "Exit type must be one of TP1, TP2, TP3, TP4, BE, SL");
const SL_DIFFERS: Message =
    Message::new("validations.slMustDifferFromEntry", "Stop Loss must be different from Entry");
const TP_DIFFERS: Message =
    Message::new("validations.tpMustDifferFromEntry", "Take Profit prices must not equal Entry Price");

#[allow(clippy::expect_used)] // constant pattern
fn pair_pattern() -> &'static Regex {
    static PAIR: OnceLock<Regex> = OnceLock::new();
    PAIR.get_or_init(|| Regex::new(r"^[A-Z]+/[A-Z]+$").expect("pair regex is valid"))
}

fn optional(value: Option<Decimal>) -> FieldValue<'static> {
    value.map_or(FieldValue::Absent, FieldValue::Number)
}

fn positive<T>(spec: FieldSpec<T>, message: Message) -> FieldSpec<T> {
    spec.rule(Constraint::Positive, message)
}

fn r_percent<T>(spec: FieldSpec<T>) -> FieldSpec<T> {
    spec.rule(Constraint::Min(MIN_R_PERCENT), R_PERCENT_MIN)
        .rule(Constraint::Max(MAX_R_PERCENT), R_PERCENT_MAX)
}

fn leverage<T>(spec: FieldSpec<T>) -> FieldSpec<T> {
    spec.rule(Constraint::Integer, LEVERAGE_INTEGER)
        .rule(Constraint::Min(Decimal::from(MIN_LEVERAGE)), LEVERAGE_MIN)
        .rule(Constraint::Max(Decimal::from(MAX_LEVERAGE)), LEVERAGE_MAX)
}

fn allocation_percent<T>(spec: FieldSpec<T>) -> FieldSpec<T> {
    spec.rule(Constraint::Min(MIN_ALLOCATION_PERCENT), PERCENT_RANGE)
        .rule(Constraint::Max(Decimal::ONE), PERCENT_RANGE)
}

/// Schema for the full trade form.
pub fn trade_form_schema() -> Schema<TradeForm> {
    Schema::new()
        .field(
            FieldSpec::field("pair", |f: &TradeForm| FieldValue::Text(&f.pair))
                .rule(Constraint::Required, PAIR_REQUIRED)
                .rule(Constraint::Pattern(pair_pattern()), PAIR_FORMAT),
        )
        .field(
            FieldSpec::field("exchange", |f: &TradeForm| FieldValue::Text(&f.exchange))
                .rule(Constraint::Required, EXCHANGE_REQUIRED),
        )
        .field(
            FieldSpec::field("portfolio_value", |f: &TradeForm| FieldValue::Number(f.portfolio_value))
                .rule(Constraint::Positive, PORTFOLIO_POSITIVE),
        )
        .field(r_percent(FieldSpec::field("r_percent", |f: &TradeForm| {
            FieldValue::Number(f.r_percent)
        })))
        .field(
            FieldSpec::field("min_rr", |f: &TradeForm| FieldValue::Number(f.min_rr))
                .rule(Constraint::Positive, MIN_RR_POSITIVE),
        )
        .field(
            FieldSpec::field("planned_pe", |f: &TradeForm| FieldValue::Number(f.planned_pe))
                .rule(Constraint::Positive, ENTRY_POSITIVE),
        )
        .field(
            FieldSpec::field("planned_sl", |f: &TradeForm| FieldValue::Number(f.planned_sl))
                .rule(Constraint::Positive, STOP_POSITIVE),
        )
        .field(leverage(FieldSpec::field("leverage", |f: &TradeForm| {
            FieldValue::Number(f.leverage)
        })))
        .field(
            FieldSpec::field("planned_tps", |f: &TradeForm| FieldValue::Count(f.planned_tps.len()))
                .rule(Constraint::MinItems(MIN_TAKE_PROFITS), AT_LEAST_ONE_TP)
                .rule(Constraint::MaxItems(MAX_TAKE_PROFITS), MAX_FOUR_TPS),
        )
        .field(
            FieldSpec::each("planned_tps", "price", |f: &TradeForm| {
                f.planned_tps.iter().map(|tp| FieldValue::Number(tp.price)).collect()
            })
            .rule(Constraint::Positive, PRICE_POSITIVE),
        )
        .field(allocation_percent(FieldSpec::each("planned_tps", "percent", |f: &TradeForm| {
            f.planned_tps.iter().map(|tp| FieldValue::Number(tp.percent)).collect()
        })))
        .field(
            FieldSpec::each("planned_entries", "price", |f: &TradeForm| {
                f.planned_entries
                    .iter()
                    .flatten()
                    .map(|e| FieldValue::Number(e.price))
                    .collect()
            })
            .rule(Constraint::Min(Decimal::ZERO), PRICE_NOT_NEGATIVE),
        )
        .field(
            FieldSpec::each("planned_entries", "percent", |f: &TradeForm| {
                f.planned_entries
                    .iter()
                    .flatten()
                    .map(|e| FieldValue::Number(e.percent))
                    .collect()
            })
            .rule(Constraint::Min(Decimal::ZERO), PERCENT_NOT_NEGATIVE),
        )
        .field(
            FieldSpec::field("effective_pe", |f: &TradeForm| optional(f.effective_pe))
                .rule(Constraint::Positive, ENTRY_POSITIVE),
        )
        .field(
            FieldSpec::each("exits", "type", |f: &TradeForm| {
                f.exits.iter().flatten().map(|e| FieldValue::Text(&e.exit_type)).collect()
            })
            .rule(Constraint::OneOf(ExitType::NAMES), EXIT_TYPE),
        )
        .field(
            FieldSpec::each("exits", "price", |f: &TradeForm| {
                f.exits.iter().flatten().map(|e| FieldValue::Number(e.price)).collect()
            })
            .rule(Constraint::Positive, PRICE_POSITIVE),
        )
        .field(allocation_percent(FieldSpec::each("exits", "percent", |f: &TradeForm| {
            f.exits.iter().flatten().map(|e| FieldValue::Number(e.percent)).collect()
        })))
        .refine("planned_sl", |f| f.planned_pe != f.planned_sl, SL_DIFFERS)
        .refine(
            "planned_tps",
            |f| f.planned_tps.iter().all(|tp| tp.price != f.planned_pe),
            TP_DIFFERS,
        )
}

/// Schema for the single-target quick calculator.
pub fn calculator_form_schema() -> Schema<CalculatorForm> {
    Schema::new()
        .field(positive(
            FieldSpec::field("portfolio", |f: &CalculatorForm| FieldValue::Number(f.portfolio)),
            CALC_PORTFOLIO_POSITIVE,
        ))
        .field(r_percent(FieldSpec::field("r_percent", |f: &CalculatorForm| {
            FieldValue::Number(f.r_percent)
        })))
        .field(positive(
            FieldSpec::field("min_rr", |f: &CalculatorForm| FieldValue::Number(f.min_rr)),
            MIN_RR_POSITIVE,
        ))
        .field(positive(
            FieldSpec::field("pe", |f: &CalculatorForm| FieldValue::Number(f.pe)),
            ENTRY_POSITIVE,
        ))
        .field(positive(
            FieldSpec::field("sl", |f: &CalculatorForm| FieldValue::Number(f.sl)),
            STOP_POSITIVE,
        ))
        .field(positive(
            FieldSpec::field("tp", |f: &CalculatorForm| FieldValue::Number(f.tp)),
            TP_POSITIVE,
        ))
        .field(leverage(FieldSpec::field("leverage", |f: &CalculatorForm| {
            FieldValue::Number(f.leverage)
        })))
}

/// Schema for the user settings form.
pub fn settings_form_schema() -> Schema<SettingsForm> {
    Schema::new()
        .field(positive(
            FieldSpec::field("initial_capital", |f: &SettingsForm| FieldValue::Number(f.initial_capital)),
            CAPITAL_POSITIVE,
        ))
        .field(r_percent(FieldSpec::field("current_r_percent", |f: &SettingsForm| {
            FieldValue::Number(f.current_r_percent)
        })))
        .field(positive(
            FieldSpec::field("default_min_rr", |f: &SettingsForm| FieldValue::Number(f.default_min_rr)),
            MIN_RR_POSITIVE,
        ))
        .field(leverage(FieldSpec::field("default_leverage", |f: &SettingsForm| {
            FieldValue::Number(f.default_leverage)
        })))
}

pub fn validate_trade_form(form: &TradeForm, translator: Option<&dyn Translator>) -> SchemaReport {
    trade_form_schema().validate(form, translator)
}

pub fn validate_calculator_form(form: &CalculatorForm, translator: Option<&dyn Translator>) -> SchemaReport {
    calculator_form_schema().validate(form, translator)
}

pub fn validate_settings_form(form: &SettingsForm, translator: Option<&dyn Translator>) -> SchemaReport {
    settings_form_schema().validate(form, translator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Allocation, Exit, PlannedTakeProfit};
    use chrono::NaiveDate;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn tp(price: Decimal, percent: Decimal) -> PlannedTakeProfit {
        PlannedTakeProfit { price, percent, rr: Decimal::ZERO }
    }

    fn trade_form() -> TradeForm {
        TradeForm {
            pair: "BTC/USDT".into(),
            exchange: "Binance".into(),
            analysis_date: date(1),
            trade_date: date(2),
            portfolio_value: dec!(10000),
            r_percent: dec!(0.01),
            min_rr: dec!(2),
            planned_pe: dec!(100),
            planned_sl: dec!(90),
            leverage: dec!(10),
            planned_tps: vec![tp(dec!(120), dec!(0.5)), tp(dec!(140), dec!(0.5))],
            planned_entries: None,
            position_type: None,
            notes: None,
            effective_pe: None,
            close_date: None,
            exits: None,
        }
    }

    #[test]
    fn test_valid_trade_form() {
        let report = validate_trade_form(&trade_form(), None);
        assert!(report.is_valid(), "{:?}", report.issues());
    }

    #[test]
    fn test_pair_format() {
        let mut form = trade_form();
        form.pair = "btc-usdt".into();
        let report = validate_trade_form(&form, None);
        assert_eq!(report.messages_for("pair"), vec!["Must be in format BTC/USDT"]);

        form.pair = String::new();
        let report = validate_trade_form(&form, None);
        assert_eq!(
            report.messages_for("pair"),
            vec!["Trading pair is required", "Must be in format BTC/USDT"]
        );
    }

    #[test]
    fn test_stop_loss_equal_to_entry() {
        let mut form = trade_form();
        form.planned_sl = dec!(100);
        let report = validate_trade_form(&form, None);
        assert!(!report.is_valid());
        assert_eq!(report.messages_for("planned_sl"), vec!["Stop Loss must be different from Entry"]);
    }

    #[test]
    fn test_take_profit_equal_to_entry() {
        let mut form = trade_form();
        form.planned_tps[1].price = dec!(100);
        let report = validate_trade_form(&form, None);
        assert_eq!(
            report.messages_for("planned_tps"),
            vec!["Take Profit prices must not equal Entry Price"]
        );
    }

    #[test]
    fn test_refinements_run_alongside_field_errors() {
        let mut form = trade_form();
        form.pair = "bad".into();
        form.planned_sl = dec!(100);
        let report = validate_trade_form(&form, None);
        assert!(report.has_issue_at("pair"));
        assert!(report.has_issue_at("planned_sl"));
    }

    #[test]
    fn test_take_profit_count_bounds() {
        let mut form = trade_form();
        form.planned_tps.clear();
        let report = validate_trade_form(&form, None);
        assert_eq!(report.messages_for("planned_tps"), vec!["At least one take profit is required"]);

        form.planned_tps = (1..=5).map(|i| tp(Decimal::from(100 + i * 10), dec!(0.2))).collect();
        let report = validate_trade_form(&form, None);
        assert_eq!(report.messages_for("planned_tps"), vec!["Maximum 4 take profits allowed"]);
    }

    #[test]
    fn test_take_profit_item_paths() {
        let mut form = trade_form();
        form.planned_tps[1] = tp(dec!(-1), dec!(0.005));
        let report = validate_trade_form(&form, None);
        assert_eq!(report.messages_for("planned_tps.1.price"), vec!["Price must be positive"]);
        assert_eq!(
            report.messages_for("planned_tps.1.percent"),
            vec!["Percent must be between 1% and 100%"]
        );
        assert!(!report.has_issue_at("planned_tps.0.price"));
    }

    #[test]
    fn test_percent_bounds_are_inclusive() {
        let mut form = trade_form();
        form.planned_tps = vec![tp(dec!(120), dec!(0.01)), tp(dec!(140), dec!(1))];
        assert!(validate_trade_form(&form, None).is_valid());
    }

    #[test]
    fn test_r_percent_bounds() {
        let mut form = trade_form();
        form.r_percent = dec!(0.0005);
        assert_eq!(
            validate_trade_form(&form, None).messages_for("r_percent"),
            vec!["R% must be at least 0.1%"]
        );
        form.r_percent = dec!(1.5);
        assert_eq!(
            validate_trade_form(&form, None).messages_for("r_percent"),
            vec!["R% cannot exceed 100%"]
        );
        form.r_percent = dec!(0.001);
        assert!(validate_trade_form(&form, None).is_valid());
    }

    #[test]
    fn test_leverage_rules() {
        let mut form = trade_form();
        form.leverage = dec!(2.5);
        assert_eq!(
            validate_trade_form(&form, None).messages_for("leverage"),
            vec!["Leverage must be a whole number"]
        );
        form.leverage = dec!(0);
        assert_eq!(
            validate_trade_form(&form, None).messages_for("leverage"),
            vec!["Leverage must be at least 1x"]
        );
        form.leverage = dec!(126);
        assert_eq!(
            validate_trade_form(&form, None).messages_for("leverage"),
            vec!["Leverage cannot exceed 125x"]
        );
        form.leverage = dec!(125);
        assert!(validate_trade_form(&form, None).is_valid());
    }

    #[test]
    fn test_placeholder_entries_pass() {
        let mut form = trade_form();
        form.planned_entries = Some(vec![
            Allocation::new(dec!(100), dec!(60)),
            Allocation::new(dec!(95), dec!(40)),
            Allocation::placeholder(),
        ]);
        assert!(validate_trade_form(&form, None).is_valid());

        form.planned_entries = Some(vec![Allocation::new(dec!(-1), dec!(100))]);
        let report = validate_trade_form(&form, None);
        assert_eq!(report.messages_for("planned_entries.0.price"), vec!["Price cannot be negative"]);
    }

    #[test]
    fn test_optional_fields_checked_when_present() {
        let mut form = trade_form();
        form.effective_pe = Some(dec!(0));
        form.exits = Some(vec![Exit {
            exit_type: "TP9".into(),
            price: dec!(130),
            percent: dec!(2),
            rr: Decimal::ZERO,
            pnl: Decimal::ZERO,
        }]);
        let report = validate_trade_form(&form, None);
        assert!(report.has_issue_at("effective_pe"));
        assert!(report.has_issue_at("exits.0.type"));
        assert!(report.has_issue_at("exits.0.percent"));
        assert!(!report.has_issue_at("exits.0.price"));
    }

    #[test]
    fn test_translated_messages_use_keys() {
        fn keys(key: &str, _: &crate::validation::MessageParams<'_>) -> String {
            key.to_string()
        }
        let mut form = trade_form();
        form.planned_sl = dec!(100);
        let report = validate_trade_form(&form, Some(&keys));
        assert_eq!(report.messages_for("planned_sl"), vec!["validations.slMustDifferFromEntry"]);
    }

    #[test]
    fn test_calculator_form() {
        let mut form = CalculatorForm {
            portfolio: dec!(5000),
            r_percent: dec!(0.02),
            min_rr: dec!(2),
            pe: dec!(100),
            sl: dec!(95),
            tp: dec!(115),
            leverage: dec!(5),
        };
        assert!(validate_calculator_form(&form, None).is_valid());

        form.portfolio = dec!(0);
        form.tp = dec!(-1);
        let report = validate_calculator_form(&form, None);
        assert_eq!(report.messages_for("portfolio"), vec!["Portfolio must be positive"]);
        assert_eq!(report.messages_for("tp"), vec!["Take profit must be positive"]);
    }

    #[test]
    fn test_settings_form() {
        let mut form = SettingsForm {
            initial_capital: dec!(10000),
            current_r_percent: dec!(0.01),
            default_min_rr: dec!(2),
            default_leverage: dec!(1),
            currency: "USD".into(),
        };
        assert!(validate_settings_form(&form, None).is_valid());

        form.initial_capital = dec!(-5);
        form.default_leverage = dec!(200);
        let report = validate_settings_form(&form, None);
        assert_eq!(report.messages_for("initial_capital"), vec!["Initial capital must be positive"]);
        assert_eq!(report.messages_for("default_leverage"), vec!["Leverage cannot exceed 125x"]);
    }
}
