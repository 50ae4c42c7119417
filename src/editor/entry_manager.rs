//! Editable list of entry rows owned by one editing session.

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

use crate::models::{Allocation, AllocationField};
use crate::trading::{weighted_price, CalcError};
use crate::validation::{validate_allocation, AllocationCheck, Translator};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    #[error("Row {index} out of range ({len} rows)")]
    RowOutOfRange { index: usize, len: usize },
}

/// Index-addressed entry rows (percent on the 0-100 scale).
///
/// Always holds at least one row; new rows start as placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryManager {
    rows: Vec<Allocation>,
}

impl Default for EntryManager {
    fn default() -> Self {
        Self {
            rows: vec![Allocation::placeholder()],
        }
    }
}

impl EntryManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing rows; an empty list yields one placeholder.
    pub fn with_rows(rows: Vec<Allocation>) -> Self {
        let mut manager = Self::default();
        manager.replace(rows);
        manager
    }

    pub fn rows(&self) -> &[Allocation] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Never true; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append a placeholder row and return its index.
    pub fn add(&mut self) -> usize {
        self.rows.push(Allocation::placeholder());
        self.rows.len() - 1
    }

    /// Remove a row. No-op (returns false) on the last remaining row or
    /// an out-of-range index.
    pub fn remove(&mut self, index: usize) -> bool {
        if self.rows.len() <= 1 || index >= self.rows.len() {
            debug!(index, rows = self.rows.len(), "Entry row not removed");
            return false;
        }
        self.rows.remove(index);
        true
    }

    pub fn update(&mut self, index: usize, field: AllocationField, value: Decimal) -> Result<(), EditorError> {
        let len = self.rows.len();
        let row = self
            .rows
            .get_mut(index)
            .ok_or(EditorError::RowOutOfRange { index, len })?;

        match field {
            AllocationField::Price => row.price = value,
            AllocationField::Percent => row.percent = value,
        }
        Ok(())
    }

    /// Replace every row, keeping at least one.
    pub fn replace(&mut self, rows: Vec<Allocation>) {
        self.rows = rows;
        if self.rows.is_empty() {
            self.rows.push(Allocation::placeholder());
        }
    }

    /// Weighted entry over the filled-in rows.
    pub fn weighted_price(&self) -> Result<Decimal, CalcError> {
        weighted_price(&self.rows, "entries")
    }

    /// Allocation check on the 0-100 scale.
    pub fn check(&self, tolerance: Decimal, translator: Option<&dyn Translator>) -> AllocationCheck {
        validate_allocation(&self.rows, tolerance, translator)
    }

    pub fn into_rows(self) -> Vec<Allocation> {
        self.rows
    }
}
