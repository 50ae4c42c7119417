//! Arithmetic degeneracies raised by the calculators.

use rust_decimal::Decimal;
use thiserror::Error;

/// A calculation that cannot produce a meaningful number yet.
///
/// These come up naturally while a form is half filled in. Callers hide
/// the derived value instead of treating the error as fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    /// No allocation in the set has both a positive price and percent.
    #[error("No valid allocations in {set}")]
    EmptyAllocation { set: &'static str },

    /// A divisor was zero.
    #[error("Division by zero computing {context}")]
    DivisionByZero { context: &'static str },

    /// A result does not fit in a Decimal.
    #[error("Overflow computing {context}")]
    Overflow { context: &'static str },

    /// A magnitude that must be non-negative was negative (caller bug).
    #[error("Negative {name}: {value}")]
    NegativeInput { name: &'static str, value: Decimal },
}

impl CalcError {
    /// True for the "not yet computable" class (as opposed to caller bugs).
    pub fn is_incomplete_input(&self) -> bool {
        matches!(
            self,
            CalcError::EmptyAllocation { .. } | CalcError::DivisionByZero { .. }
        )
    }
}

/// Divide, mapping a zero divisor to [`CalcError::DivisionByZero`] and
/// an out-of-range quotient to [`CalcError::Overflow`].
pub(crate) fn checked_div(
    numerator: Decimal,
    divisor: Decimal,
    context: &'static str,
) -> Result<Decimal, CalcError> {
    if divisor.is_zero() {
        return Err(CalcError::DivisionByZero { context });
    }
    numerator.checked_div(divisor).ok_or(CalcError::Overflow { context })
}

pub(crate) fn checked_mul(a: Decimal, b: Decimal, context: &'static str) -> Result<Decimal, CalcError> {
    a.checked_mul(b).ok_or(CalcError::Overflow { context })
}

pub(crate) fn checked_add(a: Decimal, b: Decimal, context: &'static str) -> Result<Decimal, CalcError> {
    a.checked_add(b).ok_or(CalcError::Overflow { context })
}

/// Reject negative magnitudes.
pub(crate) fn non_negative(name: &'static str, value: Decimal) -> Result<Decimal, CalcError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(CalcError::NegativeInput { name, value });
    }
    Ok(value)
}
