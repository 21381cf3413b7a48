//! Ordered option records, one per source field, with batch comparison and
//! batch reclassification plus YAML/JSON persistence.

use std::{
    fs::File,
    io::{BufReader, BufWriter},
    ops::Index,
    path::Path,
};

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{
    error::{OptionsError, OptionsResult},
    record::OptionRecord,
    registry::TypeRegistry,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptionCollection {
    #[serde(default)]
    variables: Vec<OptionRecord>,
}

impl OptionCollection {
    pub fn new(variables: Vec<OptionRecord>) -> Self {
        Self { variables }
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&OptionRecord> {
        self.variables.get(position)
    }

    pub fn get_mut(&mut self, position: usize) -> Option<&mut OptionRecord> {
        self.variables.get_mut(position)
    }

    /// Replaces the record at `position`, which may change its kind.
    pub fn set(&mut self, position: usize, record: OptionRecord) -> OptionsResult<()> {
        let len = self.len();
        let slot = self
            .variables
            .get_mut(position)
            .ok_or(OptionsError::PositionOutOfRange { position, len })?;
        *slot = record;
        Ok(())
    }

    pub fn push(&mut self, record: OptionRecord) {
        self.variables.push(record);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OptionRecord> {
        self.variables.iter()
    }

    pub fn records(&self) -> &[OptionRecord] {
        &self.variables
    }

    pub fn names(&self) -> Vec<&str> {
        self.variables.iter().map(OptionRecord::name).collect()
    }

    /// Positions of every record whose name matches one of `names`, in the
    /// order the names are given. Names are not unique, so one name may
    /// contribute several positions.
    pub fn positions_of<S: AsRef<str>>(&self, names: &[S]) -> OptionsResult<Vec<usize>> {
        let mut positions = Vec::new();
        for name in names {
            let name = name.as_ref();
            let before = positions.len();
            positions.extend(
                self.variables
                    .iter()
                    .enumerate()
                    .filter(|(_, record)| record.name() == name)
                    .map(|(idx, _)| idx),
            );
            if positions.len() == before {
                return Err(OptionsError::UnknownVariable {
                    name: name.to_string(),
                });
            }
        }
        Ok(positions)
    }

    /// Reclassifies the records at `positions`. `types` holds either one type
    /// for every position or one type per position. All types and positions are
    /// checked before any record changes.
    pub fn reclassify<S: AsRef<str>>(
        &mut self,
        positions: &[usize],
        types: &[S],
        registry: &TypeRegistry,
    ) -> OptionsResult<()> {
        let resolved = registry.resolve_all(types)?;
        if resolved.len() != 1 && resolved.len() != positions.len() {
            return Err(OptionsError::MismatchedBatch {
                positions: positions.len(),
                types: resolved.len(),
            });
        }
        let len = self.len();
        if let Some(&position) = positions.iter().find(|&&position| position >= len) {
            return Err(OptionsError::PositionOutOfRange { position, len });
        }

        let mut staged: Vec<(usize, OptionRecord)> = Vec::with_capacity(positions.len());
        for (idx, &position) in positions.iter().enumerate() {
            let target = if resolved.len() == 1 {
                resolved[0]
            } else {
                resolved[idx]
            };
            let current = staged
                .iter()
                .rev()
                .find(|(staged_position, _)| *staged_position == position)
                .map(|(_, record)| record)
                .unwrap_or(&self.variables[position]);
            let converted = current.converted_to(target)?;
            staged.push((position, converted));
        }

        for (position, record) in staged {
            self.variables[position] = record;
        }
        debug!(
            "Reclassified {} variable(s) to {:?}",
            positions.len(),
            resolved
        );
        Ok(())
    }

    /// Re-checks every record, reporting the first failure with its position.
    pub fn validate(&mut self) -> Result<()> {
        for (idx, record) in self.variables.iter_mut().enumerate() {
            let name = record.name().to_string();
            record
                .validate()
                .with_context(|| format!("Validating variable {} ('{name}')", idx + 1))?;
        }
        Ok(())
    }

    /// Loads an option set. `.json` files are read as JSON, anything else as YAML.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening options file {path:?}"))?;
        let reader = BufReader::new(file);
        let mut collection: OptionCollection = if is_json(path) {
            serde_json::from_reader(reader).context("Parsing options JSON")?
        } else {
            serde_yaml::from_reader(reader).context("Parsing options YAML")?
        };
        collection.validate()?;
        info!(
            "Loaded {} variable option(s) from {:?}",
            collection.len(),
            path
        );
        Ok(collection)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file =
            File::create(path).with_context(|| format!("Creating options file {path:?}"))?;
        let writer = BufWriter::new(file);
        if is_json(path) {
            serde_json::to_writer_pretty(writer, self).context("Writing options JSON")
        } else {
            serde_yaml::to_writer(writer, self).context("Writing options YAML")
        }
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Same length and pairwise equal records.
impl PartialEq for OptionCollection {
    fn eq(&self, other: &Self) -> bool {
        self.variables == other.variables
    }
}

impl Index<usize> for OptionCollection {
    type Output = OptionRecord;

    fn index(&self, position: usize) -> &Self::Output {
        &self.variables[position]
    }
}

impl<'a> IntoIterator for &'a OptionCollection {
    type Item = &'a OptionRecord;
    type IntoIter = std::slice::Iter<'a, OptionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.variables.iter()
    }
}

impl FromIterator<OptionRecord> for OptionCollection {
    fn from_iter<I: IntoIterator<Item = OptionRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
