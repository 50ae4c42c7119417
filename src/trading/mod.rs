//! Trade setup engine: weighting, distances, layout, position sizing, exits.

mod config;
mod distance;
mod error;
mod layout;
mod outcome;
mod position_sizer;
mod weighting;

pub use config::JournalConfig;
pub use distance::{
    distance_percentage, distances, risk_reward_ratio, stop_loss_distance, take_profit_distance,
    VisualShares,
};
pub use error::CalcError;
pub use layout::{LevelMark, SetupLayout};
pub use outcome::{exit_r_multiple, summarize_exits, ExitSummary};
pub use position_sizer::{PositionSizer, RiskParameters};
pub use weighting::{normalized_weights, weighted_price};
