//! Per-variable import option records.
//!
//! [`OptionRecord`] is a closed tagged union over the six variable kinds. Every
//! variant embeds [`SharedOptions`] (name, type, missing sentinels, quote rule,
//! affixes, empty field rule) and adds kind-specific settings plus a fill value
//! typed for that kind.
//!
//! ## Equality
//!
//! `==` compares policy, not identity: records of different kinds are never
//! equal, and `name` and the fill value are ignored. Two columns read the same
//! way compare equal even when they are labelled or filled differently.
//!
//! ## Reclassification
//!
//! [`OptionRecord::reclassify`] moves a record to another type. Inside the same
//! kind only `type` changes; across kinds a default record of the target kind
//! inherits every shared field except `type`, and the fill value resets.

use std::fmt;

use chrono::{NaiveDateTime, TimeDelta};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    error::{OptionsError, OptionsResult},
    kind::OptionKind,
    registry::{TypeRegistry, default_for_type},
    rules::{EmptyFieldRule, QuoteRule},
    validation::{
        deserialize_prefixes, deserialize_suffixes, deserialize_text_list,
        validate_and_sort_by_length,
    },
    variants::{
        CategoricalOptions, DatetimeOptions, DurationOptions, LogicalOptions, NumericOptions,
        TextOptions,
    },
};

/// Fields every variable carries regardless of kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedOptions {
    #[serde(default)]
    pub(crate) name: String,
    #[serde(rename = "type")]
    pub(crate) type_name: String,
    #[serde(
        default,
        deserialize_with = "deserialize_text_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub(crate) treat_as_missing: Vec<String>,
    #[serde(default)]
    pub(crate) quote_rule: QuoteRule,
    #[serde(
        default,
        deserialize_with = "deserialize_prefixes",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub(crate) prefixes: Vec<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_suffixes",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub(crate) suffixes: Vec<String>,
    #[serde(default)]
    pub(crate) empty_field_rule: EmptyFieldRule,
}

impl SharedOptions {
    pub(crate) fn new(type_name: &str) -> Self {
        Self {
            name: String::new(),
            type_name: type_name.to_string(),
            treat_as_missing: Vec::new(),
            quote_rule: QuoteRule::default(),
            prefixes: Vec::new(),
            suffixes: Vec::new(),
            empty_field_rule: EmptyFieldRule::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn treat_as_missing(&self) -> &[String] {
        &self.treat_as_missing
    }

    pub fn quote_rule(&self) -> QuoteRule {
        self.quote_rule
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    pub fn suffixes(&self) -> &[String] {
        &self.suffixes
    }

    pub fn empty_field_rule(&self) -> EmptyFieldRule {
        self.empty_field_rule
    }

    /// Everything but `name` matches.
    fn same_policy(&self, other: &Self) -> bool {
        self.type_name == other.type_name
            && self.treat_as_missing == other.treat_as_missing
            && self.quote_rule == other.quote_rule
            && self.prefixes == other.prefixes
            && self.suffixes == other.suffixes
            && self.empty_field_rule == other.empty_field_rule
    }

    /// Takes every field from `source` except `type`.
    fn inherit(&mut self, source: &SharedOptions) {
        let type_name = std::mem::take(&mut self.type_name);
        *self = source.clone();
        self.type_name = type_name;
    }
}

/// Kind-neutral view of a fill value.
#[derive(Debug, Clone, PartialEq)]
pub enum FillValue {
    Text(String),
    Number(f64),
    Logical(bool),
    Datetime(NaiveDateTime),
    Duration(TimeDelta),
    Category(String),
}

impl FillValue {
    pub fn kind(&self) -> OptionKind {
        match self {
            FillValue::Text(_) => OptionKind::Text,
            FillValue::Number(_) => OptionKind::Numeric,
            FillValue::Logical(_) => OptionKind::Logical,
            FillValue::Datetime(_) => OptionKind::Datetime,
            FillValue::Duration(_) => OptionKind::Duration,
            FillValue::Category(_) => OptionKind::Categorical,
        }
    }
}

impl fmt::Display for FillValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FillValue::Text(text) => write!(f, "'{text}'"),
            FillValue::Number(value) => write!(f, "{value}"),
            FillValue::Logical(value) => write!(f, "{value}"),
            FillValue::Datetime(value) => write!(f, "{}", value.format("%Y-%m-%d %H:%M:%S")),
            FillValue::Duration(value) => write!(f, "{}ms", value.num_milliseconds()),
            FillValue::Category(label) => write!(f, "<{label}>"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum OptionRecord {
    Text(TextOptions),
    Numeric(NumericOptions),
    Logical(LogicalOptions),
    Datetime(DatetimeOptions),
    Duration(DurationOptions),
    Categorical(CategoricalOptions),
}

impl OptionRecord {
    /// Default record for `kind`, typed with the kind's first legal type.
    pub fn new(kind: OptionKind) -> Self {
        match kind {
            OptionKind::Text => OptionRecord::Text(TextOptions::default()),
            OptionKind::Numeric => OptionRecord::Numeric(NumericOptions::default()),
            OptionKind::Logical => OptionRecord::Logical(LogicalOptions::default()),
            OptionKind::Datetime => OptionRecord::Datetime(DatetimeOptions::default()),
            OptionKind::Duration => OptionRecord::Duration(DurationOptions::default()),
            OptionKind::Categorical => OptionRecord::Categorical(CategoricalOptions::default()),
        }
    }

    /// Default record for `type_name`, named `name`.
    pub fn named(name: impl Into<String>, type_name: &str) -> OptionsResult<Self> {
        let mut record = default_for_type(type_name)?;
        record.set_name(name);
        Ok(record)
    }

    pub fn kind(&self) -> OptionKind {
        match self {
            OptionRecord::Text(_) => OptionKind::Text,
            OptionRecord::Numeric(_) => OptionKind::Numeric,
            OptionRecord::Logical(_) => OptionKind::Logical,
            OptionRecord::Datetime(_) => OptionKind::Datetime,
            OptionRecord::Duration(_) => OptionKind::Duration,
            OptionRecord::Categorical(_) => OptionKind::Categorical,
        }
    }

    pub fn shared(&self) -> &SharedOptions {
        match self {
            OptionRecord::Text(options) => &options.shared,
            OptionRecord::Numeric(options) => &options.shared,
            OptionRecord::Logical(options) => &options.shared,
            OptionRecord::Datetime(options) => &options.shared,
            OptionRecord::Duration(options) => &options.shared,
            OptionRecord::Categorical(options) => &options.shared,
        }
    }

    fn shared_mut(&mut self) -> &mut SharedOptions {
        match self {
            OptionRecord::Text(options) => &mut options.shared,
            OptionRecord::Numeric(options) => &mut options.shared,
            OptionRecord::Logical(options) => &mut options.shared,
            OptionRecord::Datetime(options) => &mut options.shared,
            OptionRecord::Duration(options) => &mut options.shared,
            OptionRecord::Categorical(options) => &mut options.shared,
        }
    }

    pub fn name(&self) -> &str {
        self.shared().name()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.shared_mut().name = name.into();
    }

    pub fn type_name(&self) -> &str {
        self.shared().type_name()
    }

    /// Changes `type` within the current kind. Use [`OptionRecord::reclassify`]
    /// to move to another kind.
    pub fn set_type(&mut self, type_name: &str) -> OptionsResult<()> {
        let canonical = self.legal_type(type_name)?;
        self.retype_in_kind(canonical);
        Ok(())
    }

    fn legal_type(&self, type_name: &str) -> OptionsResult<&'static str> {
        let kind = self.kind();
        kind.legal_types()
            .iter()
            .copied()
            .find(|legal| legal.eq_ignore_ascii_case(type_name.trim()))
            .ok_or_else(|| OptionsError::InvalidType {
                kind,
                type_name: type_name.to_string(),
            })
    }

    fn retype_in_kind(&mut self, canonical: &'static str) {
        match self {
            OptionRecord::Numeric(options) => options.retype(canonical),
            other => other.shared_mut().type_name = canonical.to_string(),
        }
    }

    pub fn fill_value(&self) -> Option<FillValue> {
        match self {
            OptionRecord::Text(options) => options.fill_value.clone().map(FillValue::Text),
            OptionRecord::Numeric(options) => options.fill_value.map(FillValue::Number),
            OptionRecord::Logical(options) => options.fill_value.map(FillValue::Logical),
            OptionRecord::Datetime(options) => options.fill_value.map(FillValue::Datetime),
            OptionRecord::Duration(options) => options.fill_value.map(FillValue::Duration),
            OptionRecord::Categorical(options) => {
                options.fill_value.clone().map(FillValue::Category)
            }
        }
    }

    /// Sets the fill value; it must match the record's kind (and numeric range).
    pub fn set_fill_value(&mut self, value: FillValue) -> OptionsResult<()> {
        match (self, value) {
            (OptionRecord::Text(options), FillValue::Text(text)) => {
                options.fill_value = Some(text);
            }
            (OptionRecord::Numeric(options), FillValue::Number(number)) => {
                options.check_fill(number)?;
                options.fill_value = Some(number);
            }
            (OptionRecord::Logical(options), FillValue::Logical(flag)) => {
                options.fill_value = Some(flag);
            }
            (OptionRecord::Datetime(options), FillValue::Datetime(stamp)) => {
                options.fill_value = Some(stamp);
            }
            (OptionRecord::Duration(options), FillValue::Duration(span)) => {
                options.fill_value = Some(span);
            }
            (OptionRecord::Categorical(options), FillValue::Category(label)) => {
                options.check_fill(&label)?;
                options.fill_value = Some(label);
            }
            (record, value) => {
                return Err(OptionsError::InvalidFillValue {
                    type_name: record.type_name().to_string(),
                    value: format!("{value} (a {} value)", value.kind()),
                });
            }
        }
        Ok(())
    }

    pub fn clear_fill_value(&mut self) {
        match self {
            OptionRecord::Text(options) => options.fill_value = None,
            OptionRecord::Numeric(options) => options.fill_value = None,
            OptionRecord::Logical(options) => options.fill_value = None,
            OptionRecord::Datetime(options) => options.fill_value = None,
            OptionRecord::Duration(options) => options.fill_value = None,
            OptionRecord::Categorical(options) => options.fill_value = None,
        }
    }

    pub fn treat_as_missing(&self) -> &[String] {
        self.shared().treat_as_missing()
    }

    /// Order is kept and duplicates are allowed.
    pub fn set_treat_as_missing<I, S>(&mut self, sentinels: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.shared_mut().treat_as_missing = sentinels.into_iter().map(Into::into).collect();
    }

    pub fn quote_rule(&self) -> QuoteRule {
        self.shared().quote_rule()
    }

    pub fn set_quote_rule(&mut self, rule: QuoteRule) {
        self.shared_mut().quote_rule = rule;
    }

    pub fn prefixes(&self) -> &[String] {
        self.shared().prefixes()
    }

    /// Stored longest first.
    pub fn set_prefixes<I, S>(&mut self, prefixes: I) -> OptionsResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.shared_mut().prefixes = validate_and_sort_by_length("prefixes", prefixes)?;
        Ok(())
    }

    pub fn suffixes(&self) -> &[String] {
        self.shared().suffixes()
    }

    /// Stored longest first.
    pub fn set_suffixes<I, S>(&mut self, suffixes: I) -> OptionsResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.shared_mut().suffixes = validate_and_sort_by_length("suffixes", suffixes)?;
        Ok(())
    }

    pub fn empty_field_rule(&self) -> EmptyFieldRule {
        self.shared().empty_field_rule()
    }

    pub fn set_empty_field_rule(&mut self, rule: EmptyFieldRule) {
        self.shared_mut().empty_field_rule = rule;
    }

    /// True when this record equals every record in `others`.
    pub fn equals_all<'a, I>(&self, others: I) -> bool
    where
        I: IntoIterator<Item = &'a OptionRecord>,
    {
        others.into_iter().all(|other| self == other)
    }

    /// Moves the record to `type_name`. Unsupported names fail before anything
    /// changes.
    pub fn reclassify(&mut self, type_name: &str, registry: &TypeRegistry) -> OptionsResult<()> {
        let canonical = registry.resolve_conversion(type_name)?;
        let converted = self.converted_to(canonical)?;
        *self = converted;
        Ok(())
    }

    /// Converted copy of this record; `canonical` must already be resolved
    /// against a registry.
    pub(crate) fn converted_to(&self, canonical: &'static str) -> OptionsResult<OptionRecord> {
        if self.kind().admits(canonical) {
            debug!(
                "Retyping variable '{}' from {} to {}",
                self.name(),
                self.type_name(),
                canonical
            );
            let mut next = self.clone();
            next.retype_in_kind(canonical);
            return Ok(next);
        }
        let mut next = default_for_type(canonical)?;
        debug!(
            "Converting variable '{}' from {} ({}) to {} ({})",
            self.name(),
            self.type_name(),
            self.kind(),
            canonical,
            next.kind()
        );
        next.shared_mut().inherit(self.shared());
        Ok(next)
    }

    /// Re-establishes every invariant after deserialization: canonical type
    /// spelling, affix order, fill value range, and kind-specific rules.
    pub fn validate(&mut self) -> OptionsResult<()> {
        let canonical = self.legal_type(self.type_name())?;
        let shared = self.shared_mut();
        shared.type_name = canonical.to_string();
        shared.prefixes =
            validate_and_sort_by_length("prefixes", std::mem::take(&mut shared.prefixes))?;
        shared.suffixes =
            validate_and_sort_by_length("suffixes", std::mem::take(&mut shared.suffixes))?;
        match self {
            OptionRecord::Text(_) => Ok(()),
            OptionRecord::Numeric(options) => options.check(),
            OptionRecord::Logical(options) => options.check(),
            OptionRecord::Datetime(options) => options.check(),
            OptionRecord::Duration(options) => options.check(),
            OptionRecord::Categorical(options) => options.check(),
        }
    }
}

impl PartialEq for OptionRecord {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (OptionRecord::Text(a), OptionRecord::Text(b)) => {
                a.shared.same_policy(&b.shared) && a.same_settings(b)
            }
            (OptionRecord::Numeric(a), OptionRecord::Numeric(b)) => {
                a.shared.same_policy(&b.shared) && a.same_settings(b)
            }
            (OptionRecord::Logical(a), OptionRecord::Logical(b)) => {
                a.shared.same_policy(&b.shared) && a.same_settings(b)
            }
            (OptionRecord::Datetime(a), OptionRecord::Datetime(b)) => {
                a.shared.same_policy(&b.shared) && a.same_settings(b)
            }
            (OptionRecord::Duration(a), OptionRecord::Duration(b)) => {
                a.shared.same_policy(&b.shared) && a.same_settings(b)
            }
            (OptionRecord::Categorical(a), OptionRecord::Categorical(b)) => {
                a.shared.same_policy(&b.shared) && a.same_settings(b)
            }
            _ => false,
        }
    }
}
