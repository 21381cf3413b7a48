//! `normalize` command: prepares every field of a CSV file with its column's
//! options and writes the cleaned text.
//!
//! The input is read without CSV quote handling so each field reaches the
//! quote normalizer as written. Delimiters inside quoted fields therefore
//! split the field; use a different delimiter for such files.

use anyhow::{Context, Result, bail};
use log::{info, warn};

use crate::{
    cli::NormalizeArgs, collection::OptionCollection, field::PreparedField, io_utils,
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeSummary {
    pub rows: usize,
    pub missing: usize,
}

pub fn execute(args: &NormalizeArgs) -> Result<()> {
    let options = OptionCollection::load(&args.meta)
        .with_context(|| format!("Loading options from {:?}", args.meta))?;
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);

    let mut reader = io_utils::open_csv_reader_from_path(&args.input, delimiter, true)?;
    let headers = io_utils::reader_headers(&mut reader, encoding)
        .with_context(|| format!("Reading headers from {:?}", args.input))?;
    if headers.len() != options.len() {
        bail!(
            "Options describe {} variable(s) but {:?} has {} column(s)",
            options.len(),
            args.input,
            headers.len()
        );
    }
    for (idx, (header, record)) in headers.iter().zip(options.iter()).enumerate() {
        if header.trim_matches('"') != record.name() {
            warn!(
                "Column {} header '{}' does not match variable name '{}'",
                idx + 1,
                header,
                record.name()
            );
        }
    }

    let mut writer = io_utils::open_csv_writer(args.output.as_deref(), delimiter)?;
    writer
        .write_record(options.names())
        .context("Writing output headers")?;

    let mut summary = NormalizeSummary::default();
    let mut record = csv::ByteRecord::new();
    while reader
        .read_byte_record(&mut record)
        .with_context(|| format!("Reading row {} of {:?}", summary.rows + 2, args.input))?
    {
        let row_number = summary.rows + 2;
        let fields = io_utils::decode_record(&record, encoding)
            .with_context(|| format!("Decoding row {row_number}"))?;
        let cleaned = prepare_row(&options, &fields, &args.missing_token, &mut summary)
            .with_context(|| format!("Normalizing row {row_number}"))?;
        writer
            .write_record(&cleaned)
            .with_context(|| format!("Writing row {row_number}"))?;
        summary.rows += 1;
    }
    writer.flush().context("Flushing output")?;

    info!(
        "Normalized {} row(s) across {} column(s); {} missing field(s)",
        summary.rows,
        options.len(),
        summary.missing
    );
    Ok(())
}

/// Cleans one row; each field is prepared by the record at the same position.
pub fn prepare_row(
    options: &OptionCollection,
    fields: &[String],
    missing_token: &str,
    summary: &mut NormalizeSummary,
) -> Result<Vec<String>> {
    options
        .iter()
        .zip(fields)
        .map(|(option, raw)| -> Result<String> {
            let prepared = option
                .prepare_field(raw)
                .with_context(|| format!("Column '{}'", option.name()))?;
            Ok(match prepared {
                PreparedField::Missing => {
                    summary.missing += 1;
                    missing_token.to_string()
                }
                PreparedField::Empty => String::new(),
                PreparedField::Value(text) => text.into_owned(),
            })
        })
        .collect()
}
