//! Message lookup for validation errors.
//!
//! Validators take an optional [`Translator`]. Without one they emit the
//! English fallback text; with one every message goes through it by key.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};

/// Named values interpolated into a message.
pub type MessageParams<'a> = [(&'a str, String)];

/// Looks up a localized message by key.
pub trait Translator {
    fn translate(&self, key: &str, params: &MessageParams<'_>) -> String;
}

impl<F> Translator for F
where
    F: Fn(&str, &MessageParams<'_>) -> String,
{
    fn translate(&self, key: &str, params: &MessageParams<'_>) -> String {
        self(key, params)
    }
}

/// Translation key plus the English text used when no translator is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Message {
    pub key: &'static str,
    pub fallback: &'static str,
}

impl Message {
    pub const fn new(key: &'static str, fallback: &'static str) -> Self {
        Self { key, fallback }
    }

    pub fn render(&self, translator: Option<&dyn Translator>) -> String {
        match translator {
            Some(t) => t.translate(self.key, &[]),
            None => self.fallback.to_string(),
        }
    }
}

/// Render `key` through the translator, or build the English text.
pub(crate) fn localize(
    translator: Option<&dyn Translator>,
    key: &str,
    params: &MessageParams<'_>,
    fallback: impl FnOnce() -> String,
) -> String {
    match translator {
        Some(t) => t.translate(key, params),
        None => fallback(),
    }
}

/// Flat key -> template table with `{{name}}` placeholders.
///
/// Unknown keys render as the key itself.
#[derive(Debug, Clone, Default)]
pub struct MessageCatalog {
    messages: HashMap<String, String>,
}

impl MessageCatalog {
    pub fn new(messages: HashMap<String, String>) -> Self {
        Self { messages }
    }

    /// Parse a flat JSON object of key/template pairs.
    pub fn from_json(json: &str) -> Result<Self> {
        let messages: HashMap<String, String> =
            serde_json::from_str(json).context("Failed to parse message catalog")?;
        Ok(Self::new(messages))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read message catalog {}", path.display()))?;
        Self::from_json(&json)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Translator for MessageCatalog {
    fn translate(&self, key: &str, params: &MessageParams<'_>) -> String {
        let Some(template) = self.messages.get(key) else {
            return key.to_string();
        };

        params.iter().fold(template.clone(), |text, (name, value)| {
            text.replace(&format!("{{{{{name}}}}}"), value)
        })
    }
}
