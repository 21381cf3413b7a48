//! Validation and normalization of individual option values.

use itertools::Itertools;
use serde::{Deserialize, Deserializer};
use serde_yaml::Value;

use crate::error::{OptionsError, OptionsResult};

/// Matches `value` case-insensitively against `allowed` and returns the
/// canonical spelling from the list.
pub fn validate_enum(
    property: &'static str,
    value: &str,
    allowed: &'static [&'static str],
) -> OptionsResult<&'static str> {
    let candidate = value.trim();
    allowed
        .iter()
        .copied()
        .find(|option| option.eq_ignore_ascii_case(candidate))
        .ok_or_else(|| OptionsError::InvalidEnumValue {
            property,
            value: value.to_string(),
            allowed,
        })
}

/// Returns the affixes ordered longest first. Ties keep their input order so
/// longest-match stripping stays deterministic.
pub fn validate_and_sort_by_length<I, S>(property: &'static str, values: I) -> OptionsResult<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let values = values.into_iter().map(Into::into).collect::<Vec<String>>();
    if let Some(position) = values.iter().position(|value| value.is_empty()) {
        return Err(OptionsError::InvalidAffixList {
            property,
            reason: format!("entry {} is empty", position + 1),
        });
    }
    Ok(values
        .into_iter()
        .sorted_by(|a, b| b.chars().count().cmp(&a.chars().count()))
        .collect())
}

/// Accepts a single string or a sequence of strings from a configuration value.
pub fn text_list_from_value(property: &'static str, value: &Value) -> OptionsResult<Vec<String>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::String(single) => Ok(vec![single.clone()]),
        Value::Sequence(items) => items
            .iter()
            .enumerate()
            .map(|(idx, item)| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| OptionsError::InvalidAffixList {
                        property,
                        reason: format!("entry {} is not text ({})", idx + 1, describe_value(item)),
                    })
            })
            .collect(),
        other => Err(OptionsError::InvalidAffixList {
            property,
            reason: format!("found {}", describe_value(other)),
        }),
    }
}

/// Config-facing form of [`validate_and_sort_by_length`].
pub fn affix_list_from_value(property: &'static str, value: &Value) -> OptionsResult<Vec<String>> {
    let values = text_list_from_value(property, value)?;
    validate_and_sort_by_length(property, values)
}

fn describe_value(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "text",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

pub(crate) fn deserialize_prefixes<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    affix_list_from_value("prefixes", &value).map_err(serde::de::Error::custom)
}

pub(crate) fn deserialize_suffixes<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    affix_list_from_value("suffixes", &value).map_err(serde::de::Error::custom)
}

pub(crate) fn deserialize_text_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    text_list_from_value("treat_as_missing", &value).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULES: &[&str] = &["remove", "keep", "error"];

    #[test]
    fn enum_match_is_case_insensitive_and_canonical() {
        assert_eq!(validate_enum("QuoteRule", "KEEP", RULES), Ok("keep"));
        assert_eq!(validate_enum("QuoteRule", " Remove ", RULES), Ok("remove"));
    }

    #[test]
    fn enum_rejects_unknown_value() {
        let err = validate_enum("QuoteRule", "strip", RULES).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid value 'strip' for QuoteRule. Expected one of: remove, keep, error"
        );
    }

    #[test]
    fn affixes_sort_longest_first() {
        let sorted = validate_and_sort_by_length("prefixes", ["pre", "prefix"]).unwrap();
        assert_eq!(sorted, vec!["prefix", "pre"]);
    }

    #[test]
    fn affix_ties_keep_input_order() {
        let sorted = validate_and_sort_by_length("suffixes", ["ab", "c", "cd", "xyz"]).unwrap();
        assert_eq!(sorted, vec!["xyz", "ab", "cd", "c"]);
    }

    #[test]
    fn empty_affix_is_rejected() {
        let err = validate_and_sort_by_length("prefixes", ["$", ""]).unwrap_err();
        assert!(matches!(err, OptionsError::InvalidAffixList { property: "prefixes", .. }));
    }

    #[test]
    fn affix_value_accepts_single_string() {
        let value = Value::from("USD");
        assert_eq!(affix_list_from_value("prefixes", &value).unwrap(), vec!["USD"]);
    }

    #[test]
    fn affix_value_rejects_numbers() {
        let value: Value = serde_yaml::from_str("[kg, 5]").unwrap();
        let err = affix_list_from_value("suffixes", &value).unwrap_err();
        assert_eq!(
            err.to_string(),
            "suffixes must be text or a list of text values: entry 2 is not text (a number)"
        );
        let mapping: Value = serde_yaml::from_str("{a: b}").unwrap();
        assert!(affix_list_from_value("suffixes", &mapping).is_err());
    }
}
