//! Setup metrics and trade review.

mod calculator;

pub use calculator::{calculator_form, review_trade, setup_from_form, take_profit_rr, SetupCalculator, TradeReview};
