//! Field-level results of a schema check.

use serde::{Deserialize, Serialize};

/// One failed rule, attached to the field path it concerns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    /// Dotted path, e.g. `planned_sl` or `planned_tps.1.price`
    pub path: String,
    pub message: String,
}

/// Every issue found for one form, in evaluation order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SchemaReport {
    issues: Vec<FieldIssue>,
}

impl SchemaReport {
    pub(crate) fn push(&mut self, path: impl Into<String>, message: String) {
        self.issues.push(FieldIssue {
            path: path.into(),
            message,
        });
    }

    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issues(&self) -> &[FieldIssue] {
        &self.issues
    }

    /// Messages attached to exactly this path.
    pub fn messages_for(&self, path: &str) -> Vec<&str> {
        self.issues
            .iter()
            .filter(|i| i.path == path)
            .map(|i| i.message.as_str())
            .collect()
    }

    pub fn has_issue_at(&self, path: &str) -> bool {
        self.issues.iter().any(|i| i.path == path)
    }
}
