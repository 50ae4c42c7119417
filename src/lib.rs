//! Trade setup computation and validation for a personal trading journal.
//!
//! Turns partial entries and exits (price + allocation percent) into
//! weighted prices, distances, risk/reward and position size, and checks
//! a setup against structural and business rules before it is accepted.

pub mod editor;
pub mod metrics;
pub mod models;
pub mod schema;
pub mod trading;
pub mod validation;

pub use metrics::{review_trade, SetupCalculator, TradeReview};
pub use trading::{CalcError, JournalConfig};
