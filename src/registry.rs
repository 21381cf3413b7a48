//! Supported-type registry and default record construction per type name.

use itertools::Itertools;

use crate::{
    error::{OptionsError, OptionsResult},
    kind::OptionKind,
    record::OptionRecord,
};

/// Immutable set of type names a host parser can produce. Build it once and
/// pass it by reference to reclassification calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRegistry {
    supported: Vec<&'static str>,
}

impl TypeRegistry {
    /// Every legal type of every kind.
    pub fn standard() -> Self {
        Self::for_kinds(&OptionKind::ALL)
    }

    /// Only the legal types of `kinds`, for parsers that cannot produce all of them.
    pub fn for_kinds(kinds: &[OptionKind]) -> Self {
        let supported = kinds
            .iter()
            .unique()
            .flat_map(|kind| kind.legal_types().iter().copied())
            .collect();
        Self { supported }
    }

    pub fn supported(&self) -> &[&'static str] {
        &self.supported
    }

    /// Case-insensitive lookup returning the canonical spelling.
    pub fn canonical(&self, type_name: &str) -> Option<&'static str> {
        let candidate = type_name.trim();
        self.supported
            .iter()
            .copied()
            .find(|supported| supported.eq_ignore_ascii_case(candidate))
    }

    pub fn is_supported(&self, type_name: &str) -> bool {
        self.canonical(type_name).is_some()
    }

    pub(crate) fn resolve_conversion(&self, type_name: &str) -> OptionsResult<&'static str> {
        self.canonical(type_name)
            .ok_or_else(|| OptionsError::UnsupportedConversionType {
                type_name: type_name.to_string(),
            })
    }

    /// Resolves every name before returning, so callers can fail before mutating.
    pub(crate) fn resolve_all<S: AsRef<str>>(
        &self,
        type_names: &[S],
    ) -> OptionsResult<Vec<&'static str>> {
        type_names
            .iter()
            .map(|name| self.resolve_conversion(name.as_ref()))
            .collect()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

/// Fresh default record of the kind that handles `type_name`, typed accordingly.
///
/// Unknown names are a caller error: check [`TypeRegistry::is_supported`] first.
pub fn default_for_type(type_name: &str) -> OptionsResult<OptionRecord> {
    let candidate = type_name.trim();
    let (kind, canonical) = OptionKind::ALL
        .into_iter()
        .find_map(|kind| {
            kind.legal_types()
                .iter()
                .copied()
                .find(|legal| legal.eq_ignore_ascii_case(candidate))
                .map(|legal| (kind, legal))
        })
        .ok_or_else(|| OptionsError::UnsupportedType {
            type_name: type_name.to_string(),
        })?;
    let mut record = OptionRecord::new(kind);
    if canonical != kind.default_type() {
        record.set_type(canonical)?;
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_family_maps_to_numeric_records() {
        for name in ["double", "single", "int8", "uint64"] {
            let record = default_for_type(name).unwrap();
            assert_eq!(record.kind(), OptionKind::Numeric);
            assert_eq!(record.type_name(), name);
        }
    }

    #[test]
    fn named_types_map_to_their_kinds() {
        let cases = [
            ("char", OptionKind::Text),
            ("string", OptionKind::Text),
            ("datetime", OptionKind::Datetime),
            ("duration", OptionKind::Duration),
            ("categorical", OptionKind::Categorical),
            ("logical", OptionKind::Logical),
        ];
        for (name, kind) in cases {
            let record = default_for_type(name).unwrap();
            assert_eq!(record.kind(), kind, "{name}");
            assert_eq!(record.type_name(), name);
            assert_eq!(record.fill_value(), None);
        }
    }

    #[test]
    fn unknown_type_is_unsupported() {
        assert_eq!(
            default_for_type("table").unwrap_err(),
            OptionsError::UnsupportedType {
                type_name: "table".to_string()
            }
        );
    }

    #[test]
    fn restricted_registry_limits_conversions() {
        let registry = TypeRegistry::for_kinds(&[OptionKind::Text, OptionKind::Numeric]);
        assert!(registry.is_supported("INT32"));
        assert_eq!(registry.canonical("String"), Some("string"));
        assert!(!registry.is_supported("duration"));
        assert_eq!(
            registry.resolve_all(&["double", "duration"]).unwrap_err(),
            OptionsError::UnsupportedConversionType {
                type_name: "duration".to_string()
            }
        );
    }

    #[test]
    fn standard_registry_covers_every_kind() {
        let registry = TypeRegistry::standard();
        for kind in OptionKind::ALL {
            for name in kind.legal_types() {
                assert!(registry.is_supported(name));
            }
        }
        assert!(!registry.is_supported("foo"));
    }
}
