//! Kind-specific option structs. Each embeds the [`SharedOptions`] common to
//! every variable and carries its fill value in the kind's own value type.

use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::{
    error::{OptionsError, OptionsResult},
    kind::{NumericRange, OptionKind},
    record::SharedOptions,
    rules::WhitespaceRule,
    validation::validate_enum,
};

pub const DURATION_FORMATS: &[&str] = &["dd:hh:mm:ss", "hh:mm:ss", "mm:ss", "hh:mm"];
const DEFAULT_LOCALE: &str = "en_US";

fn invalid(property: &'static str, reason: impl Into<String>) -> OptionsError {
    OptionsError::InvalidOptionValue {
        property,
        reason: reason.into(),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextOptions {
    #[serde(flatten)]
    pub(crate) shared: SharedOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) fill_value: Option<String>,
    #[serde(default)]
    whitespace_rule: WhitespaceRule,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            shared: SharedOptions::new(OptionKind::Text.default_type()),
            fill_value: None,
            whitespace_rule: WhitespaceRule::default(),
        }
    }
}

impl TextOptions {
    pub fn whitespace_rule(&self) -> WhitespaceRule {
        self.whitespace_rule
    }

    pub fn set_whitespace_rule(&mut self, rule: WhitespaceRule) {
        self.whitespace_rule = rule;
    }

    pub(crate) fn same_settings(&self, other: &Self) -> bool {
        self.whitespace_rule == other.whitespace_rule
    }
}

fn default_decimal_separator() -> char {
    '.'
}

fn default_exponent_characters() -> String {
    "eEdD".to_string()
}

fn default_field_separator() -> char {
    ':'
}

/// Non-finite fills are written as `"nan"`, `"inf"` or `"-inf"`; JSON has no
/// number for them.
mod number_fill {
    use serde::{Deserialize, Deserializer, Serializer, de};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Stored {
        Number(f64),
        Text(String),
    }

    pub fn serialize<S>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(number) if number.is_nan() => serializer.serialize_some("nan"),
            Some(number) if number.is_infinite() && *number > 0.0 => serializer.serialize_some("inf"),
            Some(number) if number.is_infinite() => serializer.serialize_some("-inf"),
            Some(number) => serializer.serialize_some(number),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Stored>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Stored::Number(number)) => Ok(Some(number)),
            Some(Stored::Text(text)) => match text.trim().to_ascii_lowercase().as_str() {
                "nan" => Ok(Some(f64::NAN)),
                "inf" | "+inf" => Ok(Some(f64::INFINITY)),
                "-inf" => Ok(Some(f64::NEG_INFINITY)),
                _ => Err(de::Error::custom(format!(
                    "numeric fill value '{text}' is not a number, 'nan', 'inf' or '-inf'"
                ))),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericOptions {
    #[serde(flatten)]
    pub(crate) shared: SharedOptions,
    #[serde(default, with = "number_fill", skip_serializing_if = "Option::is_none")]
    pub(crate) fill_value: Option<f64>,
    #[serde(default = "default_decimal_separator")]
    decimal_separator: char,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    thousands_separator: Option<char>,
    #[serde(default = "default_exponent_characters")]
    exponent_characters: String,
}

impl Default for NumericOptions {
    fn default() -> Self {
        Self {
            shared: SharedOptions::new(OptionKind::Numeric.default_type()),
            fill_value: None,
            decimal_separator: default_decimal_separator(),
            thousands_separator: None,
            exponent_characters: default_exponent_characters(),
        }
    }
}

impl NumericOptions {
    pub fn decimal_separator(&self) -> char {
        self.decimal_separator
    }

    pub fn thousands_separator(&self) -> Option<char> {
        self.thousands_separator
    }

    pub fn exponent_characters(&self) -> &str {
        &self.exponent_characters
    }

    pub fn set_decimal_separator(&mut self, separator: char) -> OptionsResult<()> {
        check_separators(separator, self.thousands_separator)?;
        self.decimal_separator = separator;
        Ok(())
    }

    pub fn set_thousands_separator(&mut self, separator: Option<char>) -> OptionsResult<()> {
        check_separators(self.decimal_separator, separator)?;
        self.thousands_separator = separator;
        Ok(())
    }

    pub fn set_exponent_characters(&mut self, characters: impl Into<String>) -> OptionsResult<()> {
        let characters = characters.into();
        check_exponent_characters(&characters)?;
        self.exponent_characters = characters;
        Ok(())
    }

    /// Fill values must be representable in the record's numeric type.
    pub(crate) fn check_fill(&self, value: f64) -> OptionsResult<()> {
        let type_name = self.shared.type_name();
        let fits = NumericRange::for_type(type_name)
            .map(|range| range.contains(value))
            .unwrap_or(false);
        if fits {
            Ok(())
        } else {
            Err(OptionsError::InvalidFillValue {
                type_name: type_name.to_string(),
                value: value.to_string(),
            })
        }
    }

    /// Switches to another numeric type, casting the fill value along.
    pub(crate) fn retype(&mut self, type_name: &'static str) {
        if let (Some(value), Some(range)) = (self.fill_value, NumericRange::for_type(type_name)) {
            self.fill_value = Some(range.cast(value));
        }
        self.shared.type_name = type_name.to_string();
    }

    pub(crate) fn check(&self) -> OptionsResult<()> {
        check_separators(self.decimal_separator, self.thousands_separator)?;
        check_exponent_characters(&self.exponent_characters)?;
        if let Some(value) = self.fill_value {
            self.check_fill(value)?;
        }
        Ok(())
    }

    pub(crate) fn same_settings(&self, other: &Self) -> bool {
        self.decimal_separator == other.decimal_separator
            && self.thousands_separator == other.thousands_separator
            && self.exponent_characters == other.exponent_characters
    }
}

fn check_separators(decimal: char, thousands: Option<char>) -> OptionsResult<()> {
    if thousands == Some(decimal) {
        return Err(invalid(
            "separators",
            format!("decimal and thousands separators cannot both be '{decimal}'"),
        ));
    }
    if decimal.is_ascii_digit() || thousands.is_some_and(|c| c.is_ascii_digit()) {
        return Err(invalid("separators", "separators cannot be digits"));
    }
    Ok(())
}

fn check_exponent_characters(characters: &str) -> OptionsResult<()> {
    if let Some(bad) = characters.chars().find(|c| !c.is_alphabetic()) {
        return Err(invalid(
            "ExponentCharacter",
            format!("'{bad}' is not a letter"),
        ));
    }
    Ok(())
}

fn default_true_symbols() -> Vec<String> {
    vec!["true".to_string(), "1".to_string()]
}

fn default_false_symbols() -> Vec<String> {
    vec!["false".to_string(), "0".to_string()]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogicalOptions {
    #[serde(flatten)]
    pub(crate) shared: SharedOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) fill_value: Option<bool>,
    #[serde(default = "default_true_symbols")]
    true_symbols: Vec<String>,
    #[serde(default = "default_false_symbols")]
    false_symbols: Vec<String>,
    #[serde(default)]
    case_sensitive: bool,
}

impl Default for LogicalOptions {
    fn default() -> Self {
        Self {
            shared: SharedOptions::new(OptionKind::Logical.default_type()),
            fill_value: None,
            true_symbols: default_true_symbols(),
            false_symbols: default_false_symbols(),
            case_sensitive: false,
        }
    }
}

impl LogicalOptions {
    pub fn true_symbols(&self) -> &[String] {
        &self.true_symbols
    }

    pub fn false_symbols(&self) -> &[String] {
        &self.false_symbols
    }

    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    pub fn set_true_symbols<I, S>(&mut self, symbols: I) -> OptionsResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let symbols = symbols.into_iter().map(Into::into).collect::<Vec<_>>();
        check_symbols(&symbols, &self.false_symbols, self.case_sensitive)?;
        self.true_symbols = symbols;
        Ok(())
    }

    pub fn set_false_symbols<I, S>(&mut self, symbols: I) -> OptionsResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let symbols = symbols.into_iter().map(Into::into).collect::<Vec<_>>();
        check_symbols(&self.true_symbols, &symbols, self.case_sensitive)?;
        self.false_symbols = symbols;
        Ok(())
    }

    pub fn set_case_sensitive(&mut self, case_sensitive: bool) -> OptionsResult<()> {
        check_symbols(&self.true_symbols, &self.false_symbols, case_sensitive)?;
        self.case_sensitive = case_sensitive;
        Ok(())
    }

    pub(crate) fn check(&self) -> OptionsResult<()> {
        check_symbols(&self.true_symbols, &self.false_symbols, self.case_sensitive)
    }

    pub(crate) fn same_settings(&self, other: &Self) -> bool {
        self.true_symbols == other.true_symbols
            && self.false_symbols == other.false_symbols
            && self.case_sensitive == other.case_sensitive
    }
}

fn check_symbols(truthy: &[String], falsy: &[String], case_sensitive: bool) -> OptionsResult<()> {
    if truthy.is_empty() || falsy.is_empty() {
        return Err(invalid("symbols", "true and false symbol lists cannot be empty"));
    }
    if truthy.iter().chain(falsy).any(|symbol| symbol.is_empty()) {
        return Err(invalid("symbols", "symbols cannot be empty text"));
    }
    let same = |a: &String, b: &String| {
        if case_sensitive {
            a == b
        } else {
            a.to_lowercase() == b.to_lowercase()
        }
    };
    if let Some(shared) = truthy.iter().find(|t| falsy.iter().any(|f| same(t, f))) {
        return Err(invalid(
            "symbols",
            format!("'{shared}' is listed as both true and false"),
        ));
    }
    Ok(())
}

fn default_locale() -> String {
    DEFAULT_LOCALE.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatetimeOptions {
    #[serde(flatten)]
    pub(crate) shared: SharedOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) fill_value: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    input_format: Option<String>,
    #[serde(default = "default_locale")]
    locale: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    time_zone: Option<String>,
}

impl Default for DatetimeOptions {
    fn default() -> Self {
        Self {
            shared: SharedOptions::new(OptionKind::Datetime.default_type()),
            fill_value: None,
            input_format: None,
            locale: default_locale(),
            time_zone: None,
        }
    }
}

impl DatetimeOptions {
    pub fn input_format(&self) -> Option<&str> {
        self.input_format.as_deref()
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn time_zone(&self) -> Option<&str> {
        self.time_zone.as_deref()
    }

    /// `format` uses strftime syntax, e.g. `%Y-%m-%d %H:%M`.
    pub fn set_input_format(&mut self, format: Option<String>) -> OptionsResult<()> {
        if let Some(format) = format.as_deref() {
            check_strftime(format)?;
        }
        self.input_format = format;
        Ok(())
    }

    pub fn set_locale(&mut self, locale: impl Into<String>) -> OptionsResult<()> {
        let locale = locale.into();
        if locale.trim().is_empty() {
            return Err(invalid("DatetimeLocale", "locale cannot be empty"));
        }
        self.locale = locale;
        Ok(())
    }

    pub fn set_time_zone(&mut self, time_zone: Option<String>) {
        self.time_zone = time_zone.filter(|zone| !zone.trim().is_empty());
    }

    pub(crate) fn check(&self) -> OptionsResult<()> {
        if let Some(format) = self.input_format.as_deref() {
            check_strftime(format)?;
        }
        if self.locale.trim().is_empty() {
            return Err(invalid("DatetimeLocale", "locale cannot be empty"));
        }
        Ok(())
    }

    pub(crate) fn same_settings(&self, other: &Self) -> bool {
        self.input_format == other.input_format
            && self.locale == other.locale
            && self.time_zone == other.time_zone
    }
}

fn check_strftime(format: &str) -> OptionsResult<()> {
    use chrono::format::{Item, StrftimeItems};

    if format.trim().is_empty() {
        return Err(invalid("InputFormat", "format cannot be empty"));
    }
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(invalid(
            "InputFormat",
            format!("'{format}' is not a valid date/time format"),
        ));
    }
    Ok(())
}

mod duration_millis {
    use chrono::TimeDelta;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S>(value: &Option<TimeDelta>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(delta) => serializer.serialize_some(&delta.num_milliseconds()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<TimeDelta>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<i64>::deserialize(deserializer)?
            .map(|millis| {
                TimeDelta::try_milliseconds(millis)
                    .ok_or_else(|| de::Error::custom(format!("duration {millis}ms is out of range")))
            })
            .transpose()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DurationOptions {
    #[serde(flatten)]
    pub(crate) shared: SharedOptions,
    #[serde(
        default,
        rename = "fill_value_ms",
        with = "duration_millis",
        skip_serializing_if = "Option::is_none"
    )]
    pub(crate) fill_value: Option<TimeDelta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    input_format: Option<String>,
    #[serde(default = "default_decimal_separator")]
    decimal_separator: char,
    #[serde(default = "default_field_separator")]
    field_separator: char,
}

impl Default for DurationOptions {
    fn default() -> Self {
        Self {
            shared: SharedOptions::new(OptionKind::Duration.default_type()),
            fill_value: None,
            input_format: None,
            decimal_separator: default_decimal_separator(),
            field_separator: default_field_separator(),
        }
    }
}

impl DurationOptions {
    pub fn input_format(&self) -> Option<&str> {
        self.input_format.as_deref()
    }

    pub fn decimal_separator(&self) -> char {
        self.decimal_separator
    }

    pub fn field_separator(&self) -> char {
        self.field_separator
    }

    /// Accepts one of [`DURATION_FORMATS`], case-insensitively.
    pub fn set_input_format(&mut self, format: Option<&str>) -> OptionsResult<()> {
        self.input_format = format
            .map(|value| validate_enum("InputFormat", value, DURATION_FORMATS))
            .transpose()?
            .map(str::to_string);
        Ok(())
    }

    pub fn set_decimal_separator(&mut self, separator: char) -> OptionsResult<()> {
        check_duration_separators(separator, self.field_separator)?;
        self.decimal_separator = separator;
        Ok(())
    }

    pub fn set_field_separator(&mut self, separator: char) -> OptionsResult<()> {
        check_duration_separators(self.decimal_separator, separator)?;
        self.field_separator = separator;
        Ok(())
    }

    pub(crate) fn check(&mut self) -> OptionsResult<()> {
        check_duration_separators(self.decimal_separator, self.field_separator)?;
        let format = self.input_format.take();
        self.set_input_format(format.as_deref())
    }

    pub(crate) fn same_settings(&self, other: &Self) -> bool {
        self.input_format == other.input_format
            && self.decimal_separator == other.decimal_separator
            && self.field_separator == other.field_separator
    }
}

fn check_duration_separators(decimal: char, field: char) -> OptionsResult<()> {
    if decimal == field {
        return Err(invalid(
            "separators",
            format!("decimal and field separators cannot both be '{decimal}'"),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoricalOptions {
    #[serde(flatten)]
    pub(crate) shared: SharedOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) fill_value: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    categories: Vec<String>,
    #[serde(default)]
    protected: bool,
    #[serde(default)]
    ordinal: bool,
}

impl Default for CategoricalOptions {
    fn default() -> Self {
        Self {
            shared: SharedOptions::new(OptionKind::Categorical.default_type()),
            fill_value: None,
            categories: Vec::new(),
            protected: false,
            ordinal: false,
        }
    }
}

impl CategoricalOptions {
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn protected(&self) -> bool {
        self.protected
    }

    pub fn ordinal(&self) -> bool {
        self.ordinal
    }

    /// Fails if a protected fill value would no longer be a category.
    pub fn set_categories<I, S>(&mut self, categories: I) -> OptionsResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let categories = categories.into_iter().map(Into::into).collect::<Vec<String>>();
        check_categories(&categories)?;
        self.check_protected_fill(self.protected, &categories)?;
        self.categories = categories;
        Ok(())
    }

    pub fn set_protected(&mut self, protected: bool) -> OptionsResult<()> {
        if !protected && self.ordinal {
            return Err(invalid(
                "Protected",
                "ordinal categorical variables must stay protected",
            ));
        }
        self.check_protected_fill(protected, &self.categories)?;
        self.protected = protected;
        Ok(())
    }

    /// Ordinal categories are always protected.
    pub fn set_ordinal(&mut self, ordinal: bool) -> OptionsResult<()> {
        if ordinal {
            self.check_protected_fill(true, &self.categories)?;
            self.protected = true;
        }
        self.ordinal = ordinal;
        Ok(())
    }

    fn check_protected_fill(&self, protected: bool, categories: &[String]) -> OptionsResult<()> {
        match self.fill_value.as_deref() {
            Some(value) if protected && !categories.iter().any(|category| category == value) => {
                Err(fill_outside_categories(self.shared.type_name(), value))
            }
            _ => Ok(()),
        }
    }

    pub(crate) fn check_fill(&self, value: &str) -> OptionsResult<()> {
        if self.protected && !self.categories.iter().any(|category| category == value) {
            return Err(fill_outside_categories(self.shared.type_name(), value));
        }
        Ok(())
    }

    pub(crate) fn check(&self) -> OptionsResult<()> {
        check_categories(&self.categories)?;
        if self.ordinal && !self.protected {
            return Err(invalid(
                "Protected",
                "ordinal categorical variables must stay protected",
            ));
        }
        self.check_protected_fill(self.protected, &self.categories)
    }

    pub(crate) fn same_settings(&self, other: &Self) -> bool {
        self.categories == other.categories
            && self.protected == other.protected
            && self.ordinal == other.ordinal
    }
}

fn fill_outside_categories(type_name: &str, value: &str) -> OptionsError {
    OptionsError::InvalidFillValue {
        type_name: type_name.to_string(),
        value: format!("'{value}' (not one of the protected categories)"),
    }
}

fn check_categories(categories: &[String]) -> OptionsResult<()> {
    for (idx, category) in categories.iter().enumerate() {
        if categories[..idx].contains(category) {
            return Err(invalid(
                "Categories",
                format!("'{category}' is listed more than once"),
            ));
        }
    }
    Ok(())
}
