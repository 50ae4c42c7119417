//! Declarative field rules and the routine that evaluates them.
//!
//! A [`Schema`] is an ordered list of field specs (an accessor plus the
//! rules for that field) followed by cross-field refinements. Every
//! failing rule is reported; a field's rules never short-circuit each
//! other. Refinements run after all field rules and attach their message
//! to a named target path.

use regex::Regex;
use rust_decimal::Decimal;
use tracing::warn;

use super::report::SchemaReport;
use crate::validation::{Message, Translator};

/// A field's value as seen by the rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Number(Decimal),
    Text(&'a str),
    /// Length of a list
    Count(usize),
    /// Optional field left empty; its rules are skipped
    Absent,
}

/// Structural constraint on a single value.
#[derive(Debug, Clone)]
pub enum Constraint {
    /// Text is not empty
    Required,
    /// Text matches the pattern
    Pattern(&'static Regex),
    /// Number > 0
    Positive,
    /// Number >= bound
    Min(Decimal),
    /// Number <= bound
    Max(Decimal),
    /// Number has no fractional part
    Integer,
    /// List has at least n items
    MinItems(usize),
    /// List has at most n items
    MaxItems(usize),
    /// Text is one of the listed names
    OneOf(&'static [&'static str]),
}

impl Constraint {
    /// `None` when the constraint does not apply to this kind of value.
    pub fn check(&self, value: &FieldValue<'_>) -> Option<bool> {
        match (self, value) {
            (Constraint::Required, FieldValue::Text(s)) => Some(!s.is_empty()),
            (Constraint::Pattern(re), FieldValue::Text(s)) => Some(re.is_match(s)),
            (Constraint::OneOf(names), FieldValue::Text(s)) => Some(names.iter().any(|n| n == s)),
            (Constraint::Positive, FieldValue::Number(n)) => Some(*n > Decimal::ZERO),
            (Constraint::Min(bound), FieldValue::Number(n)) => Some(n >= bound),
            (Constraint::Max(bound), FieldValue::Number(n)) => Some(n <= bound),
            (Constraint::Integer, FieldValue::Number(n)) => Some(n.fract().is_zero()),
            (Constraint::MinItems(min), FieldValue::Count(len)) => Some(len >= min),
            (Constraint::MaxItems(max), FieldValue::Count(len)) => Some(len <= max),
            _ => None,
        }
    }
}

/// A constraint and the message shown when it fails.
#[derive(Debug, Clone)]
pub struct Rule {
    pub constraint: Constraint,
    pub message: Message,
}

enum Accessor<T> {
    Scalar(for<'a> fn(&'a T) -> FieldValue<'a>),
    /// One value per list item; issues go to `path.index.item`
    Each {
        item: &'static str,
        values: for<'a> fn(&'a T) -> Vec<FieldValue<'a>>,
    },
}

/// Rules for one field, or for one field of every item in a list.
pub struct FieldSpec<T> {
    path: &'static str,
    accessor: Accessor<T>,
    rules: Vec<Rule>,
}

impl<T> FieldSpec<T> {
    pub fn field(path: &'static str, value: for<'a> fn(&'a T) -> FieldValue<'a>) -> Self {
        Self {
            path,
            accessor: Accessor::Scalar(value),
            rules: Vec::new(),
        }
    }

    pub fn each(
        list: &'static str,
        item: &'static str,
        values: for<'a> fn(&'a T) -> Vec<FieldValue<'a>>,
    ) -> Self {
        Self {
            path: list,
            accessor: Accessor::Each { item, values },
            rules: Vec::new(),
        }
    }

    pub fn rule(mut self, constraint: Constraint, message: Message) -> Self {
        self.rules.push(Rule { constraint, message });
        self
    }

    fn evaluate(&self, value: &T, translator: Option<&dyn Translator>, report: &mut SchemaReport) {
        match &self.accessor {
            Accessor::Scalar(get) => self.apply(self.path.to_string(), &get(value), translator, report),
            Accessor::Each { item, values } => {
                for (index, v) in values(value).iter().enumerate() {
                    self.apply(format!("{}.{index}.{item}", self.path), v, translator, report);
                }
            }
        }
    }

    fn apply(
        &self,
        path: String,
        value: &FieldValue<'_>,
        translator: Option<&dyn Translator>,
        report: &mut SchemaReport,
    ) {
        if matches!(value, FieldValue::Absent) {
            return;
        }
        for rule in &self.rules {
            match rule.constraint.check(value) {
                Some(true) => {}
                Some(false) => report.push(path.clone(), rule.message.render(translator)),
                None => warn!(path = %path, constraint = ?rule.constraint, "Rule does not apply to field value"),
            }
        }
    }
}

/// Cross-field check whose failure is attached to `path`.
pub struct Refinement<T> {
    pub path: &'static str,
    pub holds: fn(&T) -> bool,
    pub message: Message,
}

/// Ordered field specs plus refinements for a form type.
pub struct Schema<T> {
    fields: Vec<FieldSpec<T>>,
    refinements: Vec<Refinement<T>>,
}

impl<T> Default for Schema<T> {
    fn default() -> Self {
        Self {
            fields: Vec::new(),
            refinements: Vec::new(),
        }
    }
}

impl<T> Schema<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, spec: FieldSpec<T>) -> Self {
        self.fields.push(spec);
        self
    }

    pub fn refine(mut self, path: &'static str, holds: fn(&T) -> bool, message: Message) -> Self {
        self.refinements.push(Refinement { path, holds, message });
        self
    }

    /// Evaluate every field rule, then every refinement.
    pub fn validate(&self, value: &T, translator: Option<&dyn Translator>) -> SchemaReport {
        let mut report = SchemaReport::default();

        for spec in &self.fields {
            spec.evaluate(value, translator, &mut report);
        }
        for refinement in &self.refinements {
            if !(refinement.holds)(value) {
                report.push(refinement.path, refinement.message.render(translator));
            }
        }

        report
    }
}
