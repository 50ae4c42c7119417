//! Structural validation of raw form input.
//!
//! Field rules are declared per form in [`forms`]; evaluation lives in
//! [`rules`] and produces a [`SchemaReport`] keyed by field path.

pub mod forms;
mod report;
mod rules;

pub use forms::{
    calculator_form_schema, settings_form_schema, trade_form_schema, validate_calculator_form,
    validate_settings_form, validate_trade_form, MAX_LEVERAGE, MAX_TAKE_PROFITS, MIN_ALLOCATION_PERCENT,
    MIN_LEVERAGE, MIN_R_PERCENT, MAX_R_PERCENT, MIN_TAKE_PROFITS,
};
pub use report::{FieldIssue, SchemaReport};
pub use rules::{Constraint, FieldSpec, FieldValue, Refinement, Rule, Schema};
