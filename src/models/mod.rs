//! Data models for allocations, trade setups, form input and derived metrics.

mod allocation;
mod form;
mod metrics;
mod setup;

pub use allocation::{priced_total, Allocation, AllocationField, PercentScale};
pub use form::{CalculatorForm, Exit, ExitType, PlannedTakeProfit, SettingsForm, TradeForm};
pub use metrics::{Distances, PositionSizing, SetupMetrics};
pub use setup::{Level, PositionType, TradeSetup};
