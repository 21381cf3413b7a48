//! Applies a record's cleanup policy to one raw field, stopping short of type
//! conversion.

use std::borrow::Cow;

use crate::{
    error::{OptionsError, OptionsResult},
    kind::OptionKind,
    quotes::normalize_quotes,
    record::OptionRecord,
    rules::EmptyFieldRule,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreparedField<'a> {
    /// Replace with the fill value (or the parser's missing marker).
    Missing,
    /// Zero-length text kept as a value.
    Empty,
    /// Cleaned text ready for conversion.
    Value(Cow<'a, str>),
}

impl PreparedField<'_> {
    pub fn is_missing(&self) -> bool {
        matches!(self, PreparedField::Missing)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            PreparedField::Missing => None,
            PreparedField::Empty => Some(""),
            PreparedField::Value(text) => Some(text),
        }
    }
}

/// Removes the first matching prefix and then the first matching suffix.
/// Affixes are expected longest first, as records store them.
pub fn strip_affixes<'a>(text: &'a str, prefixes: &[String], suffixes: &[String]) -> &'a str {
    let text = prefixes
        .iter()
        .find_map(|prefix| text.strip_prefix(prefix.as_str()))
        .unwrap_or(text);
    suffixes
        .iter()
        .find_map(|suffix| text.strip_suffix(suffix.as_str()))
        .unwrap_or(text)
}

impl OptionRecord {
    /// Quote rule, empty field rule, missing sentinels, affixes, then
    /// whitespace, in that order.
    pub fn prepare_field<'a>(&self, raw: &'a str) -> OptionsResult<PreparedField<'a>> {
        let normalized = normalize_quotes(raw, self.quote_rule())?;
        if normalized.is_empty() {
            return self.empty_field();
        }
        if self
            .treat_as_missing()
            .iter()
            .any(|sentinel| sentinel.as_str() == normalized.trim())
        {
            return Ok(PreparedField::Missing);
        }

        let cleaned = match normalized {
            Cow::Borrowed(text) => Cow::Borrowed(self.clean(text)),
            Cow::Owned(text) => Cow::Owned(self.clean(&text).to_string()),
        };
        // Non-text values that clean down to nothing (blanks, a bare affix) are empty.
        if cleaned.is_empty() && self.kind() != OptionKind::Text {
            return self.empty_field();
        }
        Ok(PreparedField::Value(cleaned))
    }

    /// Text records honour their whitespace rule; other kinds are trimmed on
    /// both sides of the affixes.
    fn clean<'t>(&self, text: &'t str) -> &'t str {
        match self {
            OptionRecord::Text(options) => options
                .whitespace_rule()
                .apply(strip_affixes(text, self.prefixes(), self.suffixes())),
            _ => strip_affixes(text.trim(), self.prefixes(), self.suffixes()).trim(),
        }
    }

    fn empty_field<'a>(&self) -> OptionsResult<PreparedField<'a>> {
        match (self.empty_field_rule(), self.kind()) {
            (EmptyFieldRule::Missing, _) => Ok(PreparedField::Missing),
            (EmptyFieldRule::Error, _) => Err(OptionsError::EmptyFieldViolation {
                name: self.name().to_string(),
            }),
            (EmptyFieldRule::Auto, OptionKind::Text) => Ok(PreparedField::Empty),
            (EmptyFieldRule::Auto, _) => Ok(PreparedField::Missing),
        }
    }
}
