//! Variant kinds and the static table of data types each kind admits.
//!
//! Deciding whether a type change stays inside a kind or crosses into another
//! one is a membership test against [`OptionKind::legal_types`].

use std::fmt;

use serde::{Deserialize, Serialize};

pub const TEXT_TYPES: &[&str] = &["char", "string"];
pub const NUMERIC_TYPES: &[&str] = &[
    "double", "single", "int8", "int16", "int32", "int64", "uint8", "uint16", "uint32", "uint64",
];
pub const LOGICAL_TYPES: &[&str] = &["logical"];
pub const DATETIME_TYPES: &[&str] = &["datetime"];
pub const DURATION_TYPES: &[&str] = &["duration"];
pub const CATEGORICAL_TYPES: &[&str] = &["categorical"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    Text,
    Numeric,
    Logical,
    Datetime,
    Duration,
    Categorical,
}

impl OptionKind {
    pub const ALL: [OptionKind; 6] = [
        OptionKind::Text,
        OptionKind::Numeric,
        OptionKind::Logical,
        OptionKind::Datetime,
        OptionKind::Duration,
        OptionKind::Categorical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OptionKind::Text => "text",
            OptionKind::Numeric => "numeric",
            OptionKind::Logical => "logical",
            OptionKind::Datetime => "datetime",
            OptionKind::Duration => "duration",
            OptionKind::Categorical => "categorical",
        }
    }

    /// Canonical type names a record of this kind may carry.
    pub fn legal_types(&self) -> &'static [&'static str] {
        match self {
            OptionKind::Text => TEXT_TYPES,
            OptionKind::Numeric => NUMERIC_TYPES,
            OptionKind::Logical => LOGICAL_TYPES,
            OptionKind::Datetime => DATETIME_TYPES,
            OptionKind::Duration => DURATION_TYPES,
            OptionKind::Categorical => CATEGORICAL_TYPES,
        }
    }

    pub fn default_type(&self) -> &'static str {
        self.legal_types()[0]
    }

    /// Exact membership test against the canonical spellings.
    pub fn admits(&self, type_name: &str) -> bool {
        self.legal_types().contains(&type_name)
    }

    /// Kind whose legal set contains `type_name` (exact match).
    pub fn for_type(type_name: &str) -> Option<OptionKind> {
        OptionKind::ALL
            .into_iter()
            .find(|kind| kind.admits(type_name))
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Representable range of one numeric type, used to validate and cast fill values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericRange {
    Double,
    Single,
    Integer { min: f64, max: f64 },
}

impl NumericRange {
    pub fn for_type(type_name: &str) -> Option<Self> {
        let range = match type_name {
            "double" => NumericRange::Double,
            "single" => NumericRange::Single,
            "int8" => NumericRange::integer(i8::MIN as f64, i8::MAX as f64 + 1.0),
            "int16" => NumericRange::integer(i16::MIN as f64, i16::MAX as f64 + 1.0),
            "int32" => NumericRange::integer(i32::MIN as f64, i32::MAX as f64 + 1.0),
            "int64" => NumericRange::integer(i64::MIN as f64, 2f64.powi(63)),
            "uint8" => NumericRange::integer(0.0, u8::MAX as f64 + 1.0),
            "uint16" => NumericRange::integer(0.0, u16::MAX as f64 + 1.0),
            "uint32" => NumericRange::integer(0.0, u32::MAX as f64 + 1.0),
            "uint64" => NumericRange::integer(0.0, 2f64.powi(64)),
            _ => return None,
        };
        Some(range)
    }

    /// `limit` is the exclusive upper bound, a power of two. `max` becomes the
    /// largest integral f64 below it, which for 64-bit types is not `limit - 1`.
    fn integer(min: f64, limit: f64) -> Self {
        let below = limit - 1.0;
        let max = if below < limit {
            below
        } else {
            f64::from_bits(limit.to_bits() - 1)
        };
        NumericRange::Integer { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        match *self {
            NumericRange::Double => true,
            NumericRange::Single => {
                !value.is_finite() || value.abs() <= f32::MAX as f64
            }
            NumericRange::Integer { min, max } => {
                value.is_finite() && value.fract() == 0.0 && value >= min && value <= max
            }
        }
    }

    /// Casts `value` into this range: integers round half away from zero and
    /// saturate, NaN becomes zero; single drops to f32 precision.
    pub fn cast(&self, value: f64) -> f64 {
        match *self {
            NumericRange::Double => value,
            NumericRange::Single => (value as f32) as f64,
            NumericRange::Integer { min, max } => {
                if value.is_nan() {
                    0.0
                } else {
                    value.round().clamp(min, max)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_type_belongs_to_exactly_one_kind() {
        for kind in OptionKind::ALL {
            for type_name in kind.legal_types() {
                let owners = OptionKind::ALL
                    .iter()
                    .filter(|candidate| candidate.admits(type_name))
                    .count();
                assert_eq!(owners, 1, "{type_name} claimed by {owners} kinds");
                assert_eq!(OptionKind::for_type(type_name), Some(kind));
            }
        }
        assert_eq!(OptionKind::for_type("foo"), None);
    }

    #[test]
    fn integer_range_rejects_fractions_and_overflow() {
        let int8 = NumericRange::for_type("int8").expect("int8 range");
        assert!(int8.contains(-128.0));
        assert!(!int8.contains(128.0));
        assert!(!int8.contains(1.5));
        assert!(!int8.contains(f64::NAN));
        assert_eq!(int8.cast(300.0), 127.0);
        assert_eq!(int8.cast(-2.5), -3.0);
        assert_eq!(int8.cast(f64::NAN), 0.0);
    }

    #[test]
    fn sixty_four_bit_ranges_exclude_their_power_of_two() {
        let int64 = NumericRange::for_type("int64").expect("int64 range");
        assert!(!int64.contains(2f64.powi(63)));
        assert!(int64.contains(2f64.powi(63) - 1024.0));
        assert!(int64.contains(-(2f64.powi(63))));
        assert_eq!(int64.cast(1.0e300), 9_223_372_036_854_774_784.0);
        assert!(int64.cast(1.0e300) < i64::MAX as f64);

        let uint64 = NumericRange::for_type("uint64").expect("uint64 range");
        assert!(!uint64.contains(2f64.powi(64)));
        assert!(uint64.contains(2f64.powi(64) - 2048.0));
        assert_eq!(uint64.cast(f64::INFINITY), 18_446_744_073_709_549_568.0);

        let int32 = NumericRange::for_type("int32").expect("int32 range");
        assert!(int32.contains(i32::MAX as f64));
        assert!(!int32.contains(i32::MAX as f64 + 1.0));
    }

    #[test]
    fn single_range_allows_non_finite() {
        let single = NumericRange::for_type("single").expect("single range");
        assert!(single.contains(f64::INFINITY));
        assert!(single.contains(1.0e30));
        assert!(!single.contains(1.0e300));
        assert_eq!(single.cast(0.1), 0.1f32 as f64);
    }
}
