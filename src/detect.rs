//! Builds a starting option set by sampling a CSV file.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use encoding_rs::Encoding;
use log::{debug, info};

use crate::{
    collection::OptionCollection,
    io_utils,
    kind::OptionKind,
    record::OptionRecord,
};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%m/%d/%Y"];

#[derive(Debug, Clone)]
struct KindCandidate {
    possible_logical: bool,
    possible_numeric: bool,
    possible_datetime: bool,
    possible_duration: bool,
    observed: usize,
}

impl KindCandidate {
    fn new() -> Self {
        Self {
            possible_logical: true,
            possible_numeric: true,
            possible_datetime: true,
            possible_duration: true,
            observed: 0,
        }
    }

    fn observe(&mut self, value: &str) {
        self.observed += 1;
        if self.possible_logical && !looks_logical(value) {
            self.possible_logical = false;
        }
        if self.possible_numeric && value.parse::<f64>().is_err() {
            self.possible_numeric = false;
        }
        if self.possible_datetime && !looks_datetime(value) {
            self.possible_datetime = false;
        }
        if self.possible_duration && !looks_duration(value) {
            self.possible_duration = false;
        }
    }

    fn decide(&self) -> OptionKind {
        if self.observed == 0 {
            OptionKind::Text
        } else if self.possible_logical {
            OptionKind::Logical
        } else if self.possible_numeric {
            OptionKind::Numeric
        } else if self.possible_datetime {
            OptionKind::Datetime
        } else if self.possible_duration {
            OptionKind::Duration
        } else {
            OptionKind::Text
        }
    }
}

fn looks_logical(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false")
}

fn looks_datetime(value: &str) -> bool {
    DATETIME_FORMATS
        .iter()
        .any(|fmt| NaiveDateTime::parse_from_str(value, fmt).is_ok())
        || DATE_FORMATS
            .iter()
            .any(|fmt| NaiveDate::parse_from_str(value, fmt).is_ok())
}

/// `[-]hh:mm:ss[.fff]`, hours of any width.
fn looks_duration(value: &str) -> bool {
    let unsigned = value.strip_prefix('-').unwrap_or(value);
    let mut parts = unsigned.split(':');
    let (Some(hours), Some(minutes), Some(seconds), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    let (whole_seconds, fraction) = match seconds.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (seconds, None),
    };
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    let sexagesimal = |s: &str| s.len() == 2 && digits(s) && s < "60";
    digits(hours)
        && sexagesimal(minutes)
        && sexagesimal(whole_seconds)
        && fraction.is_none_or(digits)
}

/// Variable name for a header cell; blank headers become `Var{n}`.
fn variable_name(header: &str, position: usize) -> String {
    let trimmed = header.trim();
    if trimmed.is_empty() {
        format!("Var{}", position + 1)
    } else {
        trimmed.to_string()
    }
}

/// Samples up to `sample_rows` rows (0 reads everything) and proposes one
/// record per column.
pub fn detect_options(
    path: &Path,
    sample_rows: usize,
    delimiter: u8,
    encoding: &'static Encoding,
) -> Result<OptionCollection> {
    let mut reader = io_utils::open_csv_reader_from_path(path, delimiter, false)?;
    let headers = io_utils::reader_headers(&mut reader, encoding)
        .with_context(|| format!("Reading headers from {path:?}"))?;
    let mut candidates = vec![KindCandidate::new(); headers.len()];

    let mut record = csv::ByteRecord::new();
    let mut processed = 0usize;
    while sample_rows == 0 || processed < sample_rows {
        if !reader
            .read_byte_record(&mut record)
            .with_context(|| format!("Reading row {} of {path:?}", processed + 2))?
        {
            break;
        }
        let fields = io_utils::decode_record(&record, encoding)
            .with_context(|| format!("Decoding row {} of {path:?}", processed + 2))?;
        for (candidate, field) in candidates.iter_mut().zip(&fields) {
            let value = field.trim();
            if !value.is_empty() {
                candidate.observe(value);
            }
        }
        processed += 1;
    }

    let collection = headers
        .iter()
        .zip(&candidates)
        .enumerate()
        .map(|(idx, (header, candidate))| {
            let kind = candidate.decide();
            let mut record = OptionRecord::new(kind);
            record.set_name(variable_name(header, idx));
            debug!(
                "Column {} '{}' detected as {} from {} value(s)",
                idx + 1,
                record.name(),
                record.type_name(),
                candidate.observed
            );
            record
        })
        .collect::<OptionCollection>();
    info!(
        "Detected options for {} column(s) from {} sampled row(s)",
        collection.len(),
        processed
    );
    Ok(collection)
}
