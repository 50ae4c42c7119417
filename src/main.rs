//! Trading journal calculator
//!
//! Computes weighted entries and targets, risk/reward and position size
//! for a trade setup, and checks trade forms before they are logged.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use trade_journal::metrics::{calculator_form, review_trade, take_profit_rr, SetupCalculator, TradeReview};
use trade_journal::models::{Allocation, PercentScale, PositionType, SetupMetrics, TradeForm, TradeSetup};
use trade_journal::schema::validate_calculator_form;
use trade_journal::trading::{weighted_price, JournalConfig, RiskParameters};
use trade_journal::validation::{validate_allocation, MessageCatalog, TradeCheck, TradeValidator, Translator};

/// Trading journal CLI.
#[derive(Parser)]
#[command(name = "tradejournal")]
#[command(about = "Risk/reward and position sizing for trade setups", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate metrics for a setup
    Calc {
        /// Entry fill as PRICE:PERCENT (0-100), repeatable
        #[arg(short, long = "entry", required = true, value_parser = parse_allocation)]
        entries: Vec<Allocation>,

        /// Stop-loss price
        #[arg(short, long)]
        stop_loss: Decimal,

        /// Take-profit as PRICE:PERCENT (0-100), repeatable
        #[arg(short, long = "tp", required = true, value_parser = parse_allocation)]
        take_profits: Vec<Allocation>,

        /// long or short; inferred from the stop when omitted
        #[arg(long)]
        position: Option<PositionType>,

        /// Portfolio value
        #[arg(short, long, env = "JOURNAL_PORTFOLIO")]
        portfolio: Decimal,

        /// Fraction of portfolio risked (0.01 = 1%)
        #[arg(short, long)]
        risk: Option<Decimal>,

        /// Leverage multiplier
        #[arg(long)]
        leverage: Option<u32>,

        /// Minimum acceptable risk/reward
        #[arg(long)]
        min_rr: Option<Decimal>,

        /// Highest leverage considered safe
        #[arg(long)]
        max_leverage: Option<u32>,
    },

    /// Check a trade form stored as JSON
    Check {
        /// Trade form file
        file: PathBuf,

        /// Message catalog (flat JSON of key -> template)
        #[arg(short, long)]
        messages: Option<PathBuf>,
    },

    /// Show current configuration
    Config,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Setup logging
    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = JournalConfig::from_env()?;

    match cli.command {
        Commands::Calc {
            entries,
            stop_loss,
            take_profits,
            position,
            portfolio,
            risk,
            leverage,
            min_rr,
            max_leverage,
        } => {
            let params = RiskParameters {
                portfolio_value: portfolio,
                risk_percent: risk.unwrap_or(config.default_risk_percent),
                leverage: leverage.unwrap_or(config.default_leverage),
            };
            let min_rr = min_rr.unwrap_or(config.default_min_rr);
            let max_leverage = max_leverage.unwrap_or(config.max_safe_leverage);

            let form = calculator_form(&entries, stop_loss, &take_profits, &params, min_rr)?;
            let report = validate_calculator_form(&form, None);
            if !report.is_valid() {
                println!("\nInput issues:");
                for issue in report.issues() {
                    println!("  {:<12} {}", issue.path, issue.message);
                }
                bail!("Invalid calculator input");
            }

            let position_type = match position {
                Some(p) => p,
                None => {
                    let entry = weighted_price(&entries, "entries")?;
                    match PositionType::infer(entry, stop_loss) {
                        Some(p) => p,
                        None => bail!("Stop loss equals entry ({entry}); pass --position"),
                    }
                }
            };
            info!(position = %position_type, entries = entries.len(), "Calculating setup");

            let setup = TradeSetup::new(entries, stop_loss, take_profits, position_type);
            let metrics = SetupCalculator::calculate(&setup, &params)?;
            print_setup(&setup, &metrics, &params, &config)?;

            let entry_check = validate_allocation(&setup.entries, config.allocation_tolerance, None);
            let tp_check = validate_allocation(&setup.take_profits, config.allocation_tolerance, None);

            let check = TradeCheck {
                risk_reward_ratio: metrics.risk_reward_ratio,
                min_risk_reward: min_rr,
                leverage: params.leverage,
                max_leverage,
                total_take_profit_percent: tp_check.total_fraction(),
            };
            let validation = TradeValidator::new(config.take_profit_tolerance).validate(&check, None);

            println!("\nValidation:");
            let errors: Vec<&String> = entry_check.errors.iter().chain(validation.errors.iter()).collect();
            if errors.is_empty() {
                println!("  OK");
            }
            for error in errors {
                println!("  - {}", error);
            }
        }

        Commands::Check { file, messages } => {
            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let form: TradeForm = serde_json::from_str(&raw)
                .with_context(|| format!("Failed to parse trade form {}", file.display()))?;

            let catalog = messages.as_deref().map(MessageCatalog::from_file).transpose()?;
            let translator = catalog.as_ref().map(|c| c as &dyn Translator);

            let review = review_trade(&form, &config, translator);
            print_review(&form, &review);

            if !review.accepted() {
                bail!("Trade rejected");
            }
        }

        Commands::Config => {
            println!("\n=== Journal Configuration ===\n");
            println!("Validation:");
            println!("  Allocation Tolerance: {} pts", config.allocation_tolerance);
            println!("  TP Tolerance:         {}%", config.take_profit_tolerance * dec!(100));
            println!("  Default Min RR:       {}", config.default_min_rr);
            println!("  Max Safe Leverage:    {}x", config.max_safe_leverage);

            println!("\nSizing Defaults:");
            println!("  Risk per Trade:       {}%", config.default_risk_percent * dec!(100));
            println!("  Leverage:             {}x", config.default_leverage);
            println!("  Currency:             {}", config.currency);
        }
    }

    Ok(())
}

fn print_setup(
    setup: &TradeSetup,
    metrics: &SetupMetrics,
    params: &RiskParameters,
    config: &JournalConfig,
) -> Result<()> {
    let layout = SetupCalculator::layout(setup, metrics)?;
    let currency = &config.currency;

    println!("\n=== {} Setup ===\n", setup.position_type);
    println!("  {:<12} {:>14}", layout.top.label(), layout.top.price.round_dp(4));
    println!("  {:<12} {:>14}", layout.entry_label(), layout.entry.round_dp(4));
    println!("  {:<12} {:>14}", layout.bottom.label(), layout.bottom.price.round_dp(4));

    println!("\nDistances:");
    println!(
        "  Stop Loss:    {} ({}%)",
        metrics.distances.stop_loss.round_dp(4),
        (metrics.distances.stop_loss_pct * dec!(100)).round_dp(2)
    );
    println!(
        "  Take Profit:  {} ({}%)",
        metrics.distances.take_profit.round_dp(4),
        (metrics.distances.take_profit_pct * dec!(100)).round_dp(2)
    );
    println!("  RR:           {}", metrics.risk_reward_ratio.round_dp(2));

    let tps: Vec<Allocation> = setup.take_profits.iter().copied().filter(Allocation::is_weighted).collect();
    if tps.len() > 1 {
        println!("\nTargets:");
        for (i, tp) in tps.iter().enumerate() {
            let rr = take_profit_rr(metrics.weighted_entry, setup.stop_loss, tp.price)?;
            println!("  TP{}  {:>12}  {:>6}%  RR {}", i + 1, tp.price, tp.percent, rr.round_dp(2));
        }
    }

    println!("\nPosition:");
    println!("  1R:           {} {}", metrics.sizing.one_r.round_dp(2), currency);
    println!("  Size:         {} {}", metrics.sizing.position_size.round_dp(2), currency);
    println!("  Margin:       {} {} ({}x)", metrics.sizing.margin.round_dp(2), currency, params.leverage);
    println!("  Quantity:     {}", metrics.quantity.round_dp(6));
    Ok(())
}

fn print_review(form: &TradeForm, review: &TradeReview) {
    println!("\n=== {} on {} ===\n", form.pair, form.exchange);

    if !review.schema.is_valid() {
        println!("Form issues:");
        for issue in review.schema.issues() {
            println!("  {:<24} {}", issue.path, issue.message);
        }
        return;
    }

    if let Some(reason) = &review.not_computable {
        println!("Metrics not computable: {}", reason);
    }
    if let Some(m) = &review.metrics {
        println!("Entry (avg):  {}", m.weighted_entry.round_dp(4));
        println!("TP (avg):     {}", m.weighted_take_profit.round_dp(4));
        println!("RR:           {}", m.risk_reward_ratio.round_dp(2));
        println!("Size:         {}", m.sizing.position_size.round_dp(2));
        println!("Margin:       {}", m.sizing.margin.round_dp(2));
    }
    if let Some(exits) = &review.exits {
        println!("\nExits:");
        println!("  Closed:       {}%", PercentScale::Percent.from_fraction(exits.closed_percent).normalize());
        println!("  P&L:          {}", exits.pnl.round_dp(2));
        println!("  P&L (R):      {}", exits.pnl_in_r.round_dp(2));
    }

    let errors: Vec<String> = review
        .entry_allocation
        .iter()
        .flat_map(|a| a.errors.clone())
        .chain(review.validation.iter().flat_map(|v| v.errors.clone()))
        .collect();

    println!("\nValidation:");
    if errors.is_empty() && review.accepted() {
        println!("  OK");
    }
    for error in errors {
        println!("  - {}", error);
    }
}

/// Parse `PRICE:PERCENT`.
fn parse_allocation(s: &str) -> Result<Allocation, String> {
    let (price, percent) = s
        .split_once(':')
        .ok_or_else(|| format!("expected PRICE:PERCENT, got {s}"))?;
    let price: Decimal = price.trim().parse().map_err(|e| format!("invalid price {price}: {e}"))?;
    let percent: Decimal = percent
        .trim()
        .parse()
        .map_err(|e| format!("invalid percent {percent}: {e}"))?;
    Ok(Allocation::new(price, percent))
}
