//! Error types for import option validation and conversion.

use thiserror::Error;

use crate::kind::OptionKind;

/// Result alias used throughout the option model.
pub type OptionsResult<T> = std::result::Result<T, OptionsError>;

/// Errors raised while assigning, converting, or applying import options.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionsError {
    /// A rule property received a value outside its enumeration.
    #[error("Invalid value '{value}' for {property}. Expected one of: {}", .allowed.join(", "))]
    InvalidEnumValue {
        property: &'static str,
        value: String,
        allowed: &'static [&'static str],
    },

    /// Prefix or suffix input was not a list of non-empty text values.
    #[error("{property} must be text or a list of text values: {reason}")]
    InvalidAffixList {
        property: &'static str,
        reason: String,
    },

    /// The type name is not legal for the record's kind.
    #[error("Type '{type_name}' is not valid for {kind} options. Expected one of: {}", .kind.legal_types().join(", "))]
    InvalidType { kind: OptionKind, type_name: String },

    /// The fill value does not fit the record's type.
    #[error("Fill value {value} is not valid for type '{type_name}'")]
    InvalidFillValue { type_name: String, value: String },

    /// A kind-specific property failed validation.
    #[error("Invalid {property}: {reason}")]
    InvalidOptionValue {
        property: &'static str,
        reason: String,
    },

    /// No variant handles this type name. Callers are expected to check the
    /// supported-type registry first.
    #[error("No import options variant handles type '{type_name}'")]
    UnsupportedType { type_name: String },

    /// A reclassification target is not in the supported-type registry.
    #[error("Unable to convert to type '{type_name}': type is not supported")]
    UnsupportedConversionType { type_name: String },

    /// Quoted text was found while the quote rule is `error`.
    #[error("Quoted text is not allowed when the quote rule is 'error': {text}")]
    QuoteRuleViolation { text: String },

    /// A zero-length field was found while the empty field rule is `error`.
    #[error("Empty field found in variable '{name}' while the empty field rule is 'error'")]
    EmptyFieldViolation { name: String },

    /// Batch reclassification received unpaired positions and types.
    #[error("Positions and types must pair up: got {positions} position(s) and {types} type(s)")]
    MismatchedBatch { positions: usize, types: usize },

    /// A position does not address a variable in the collection.
    #[error("Position {position} is out of range for {len} variable(s)")]
    PositionOutOfRange { position: usize, len: usize },

    /// A variable name lookup found no match.
    #[error("Unknown variable '{name}'")]
    UnknownVariable { name: String },
}
