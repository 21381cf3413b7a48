//! Enumerated text-handling policies: quote, empty field, and whitespace rules.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::{error::OptionsError, validation::validate_enum};

macro_rules! rule_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $property:literal, default = $default:ident,
        { $($variant:ident => $token:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            pub const VALUES: &'static [&'static str] = &[$($token),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $token,)+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl FromStr for $name {
            type Err = OptionsError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match validate_enum($property, value, Self::VALUES)? {
                    $($token => Ok($name::$variant),)+
                    other => unreachable!("validate_enum returned '{other}' outside VALUES"),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let token = String::deserialize(deserializer)?;
                token.parse().map_err(de::Error::custom)
            }
        }
    };
}

rule_enum! {
    /// Handling of double quotes surrounding a raw field.
    QuoteRule, "QuoteRule", default = Remove,
    { Remove => "remove", Keep => "keep", Error => "error" }
}

rule_enum! {
    /// Handling of zero-length fields.
    EmptyFieldRule, "EmptyFieldRule", default = Missing,
    { Missing => "missing", Error => "error", Auto => "auto" }
}

rule_enum! {
    /// Whitespace trimming applied to text variables.
    WhitespaceRule, "WhitespaceRule", default = Trim,
    {
        Trim => "trim",
        TrimLeading => "trimleading",
        TrimTrailing => "trimtrailing",
        Preserve => "preserve",
    }
}

impl WhitespaceRule {
    pub fn apply<'a>(&self, text: &'a str) -> &'a str {
        match self {
            WhitespaceRule::Trim => text.trim(),
            WhitespaceRule::TrimLeading => text.trim_start(),
            WhitespaceRule::TrimTrailing => text.trim_end(),
            WhitespaceRule::Preserve => text,
        }
    }
}
