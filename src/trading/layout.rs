//! Direction-aware placement of the stop and target around the entry.

use rust_decimal::Decimal;

use super::distance::{stop_loss_distance, take_profit_distance, VisualShares};
use super::error::CalcError;
use crate::models::{Level, PositionType};

/// One price level in the drawn setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelMark {
    pub level: Level,
    pub price: Decimal,
    /// Share of the bar height for this side (0-1)
    pub share: Decimal,
    /// Price is an average of more than one fill
    pub averaged: bool,
}

impl LevelMark {
    /// "TP", "TP (avg)", "SL".
    pub fn label(&self) -> String {
        if self.averaged {
            format!("{} (avg)", self.level.label())
        } else {
            self.level.label().to_string()
        }
    }
}

/// Top, entry and bottom marks for a setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetupLayout {
    pub position_type: PositionType,
    pub top: LevelMark,
    pub entry: Decimal,
    pub entry_averaged: bool,
    pub bottom: LevelMark,
}

impl SetupLayout {
    /// Long: target above, stop below. Short: stop above, target below.
    ///
    /// `entry_fills` / `target_fills` are the number of weighted rows
    /// behind each price and only drive the "(avg)" marker.
    pub fn new(
        position_type: PositionType,
        weighted_entry: Decimal,
        stop_loss: Decimal,
        weighted_take_profit: Decimal,
        entry_fills: usize,
        target_fills: usize,
    ) -> Result<Self, CalcError> {
        let shares = VisualShares::new(
            stop_loss_distance(weighted_entry, stop_loss),
            take_profit_distance(weighted_entry, weighted_take_profit),
        )?;

        let target = LevelMark {
            level: Level::TakeProfit,
            price: weighted_take_profit,
            share: shares.take_profit,
            averaged: target_fills > 1,
        };
        let stop = LevelMark {
            level: Level::StopLoss,
            price: stop_loss,
            share: shares.stop_loss,
            averaged: false,
        };

        let (top, bottom) = match position_type {
            PositionType::Long => (target, stop),
            PositionType::Short => (stop, target),
        };

        Ok(Self {
            position_type,
            top,
            entry: weighted_entry,
            entry_averaged: entry_fills > 1,
            bottom,
        })
    }

    pub fn entry_label(&self) -> &'static str {
        if self.entry_averaged {
            "Entry (avg)"
        } else {
            "Entry"
        }
    }
}
