pub mod cli;
pub mod collection;
pub mod detect;
pub mod error;
pub mod field;
pub mod io_utils;
pub mod kind;
pub mod normalize;
pub mod quotes;
pub mod record;
pub mod registry;
pub mod rules;
pub mod validation;
pub mod variants;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::{LevelFilter, debug, info};

use crate::cli::{Cli, Commands};

pub use crate::{
    collection::OptionCollection,
    error::{OptionsError, OptionsResult},
    field::PreparedField,
    kind::OptionKind,
    quotes::normalize_quotes,
    record::{FillValue, OptionRecord},
    registry::{TypeRegistry, default_for_type},
    rules::{EmptyFieldRule, QuoteRule, WhitespaceRule},
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("csv_import_options", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let registry = TypeRegistry::standard();
    match cli.command {
        Commands::Detect(args) => handle_detect(&args),
        Commands::Reclassify(args) => handle_reclassify(&args, &registry),
        Commands::Compare(args) => handle_compare(&args),
        Commands::Normalize(args) => normalize::execute(&args),
    }
}

fn handle_detect(args: &cli::DetectArgs) -> Result<()> {
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    info!(
        "Detecting options for '{}' with delimiter '{}'",
        args.input.display(),
        printable_delimiter(delimiter)
    );
    let options = detect::detect_options(&args.input, args.sample_rows, delimiter, encoding)
        .with_context(|| format!("Detecting options from {:?}", args.input))?;
    options
        .save(&args.meta)
        .with_context(|| format!("Writing options to {:?}", args.meta))?;
    info!(
        "Options for {} variable(s) written to {:?}",
        options.len(),
        args.meta
    );
    Ok(())
}

fn handle_reclassify(args: &cli::ReclassifyArgs, registry: &TypeRegistry) -> Result<()> {
    let mut options = OptionCollection::load(&args.meta)
        .with_context(|| format!("Loading options from {:?}", args.meta))?;

    let mut positions = Vec::with_capacity(args.positions.len() + args.columns.len());
    for &position in &args.positions {
        if position == 0 {
            bail!("Positions are 1-based; 0 does not address a variable");
        }
        positions.push(position - 1);
    }
    positions.extend(options.positions_of(&args.columns)?);
    if positions.is_empty() {
        bail!("Select at least one variable with --column or --position");
    }
    debug!("Reclassifying positions {:?} to {:?}", positions, args.types);

    options
        .reclassify(&positions, &args.types, registry)
        .context("Reclassifying variables")?;

    let destination = args.output.as_deref().unwrap_or(&args.meta);
    options
        .save(destination)
        .with_context(|| format!("Writing options to {destination:?}"))?;
    info!(
        "Reclassified {} variable(s); options written to {:?}",
        positions.len(),
        destination
    );
    Ok(())
}

fn handle_compare(args: &cli::CompareArgs) -> Result<()> {
    let left = OptionCollection::load(&args.left)
        .with_context(|| format!("Loading options from {:?}", args.left))?;
    let right = OptionCollection::load(&args.right)
        .with_context(|| format!("Loading options from {:?}", args.right))?;
    if left == right {
        println!("equivalent");
        return Ok(());
    }

    let differences = describe_differences(&left, &right);
    for line in &differences {
        println!("{line}");
    }
    bail!("Options differ at {} position(s)", differences.len())
}

/// One line per position whose records are not equal.
pub fn describe_differences(left: &OptionCollection, right: &OptionCollection) -> Vec<String> {
    let describe = |record: &OptionRecord| format!("'{}' ({})", record.name(), record.type_name());
    (0..left.len().max(right.len()))
        .filter_map(|idx| match (left.get(idx), right.get(idx)) {
            (Some(a), Some(b)) if a == b => None,
            (Some(a), Some(b)) => Some(format!(
                "variable {}: {} differs from {}",
                idx + 1,
                describe(a),
                describe(b)
            )),
            (Some(a), None) => Some(format!("variable {}: {} only on the left", idx + 1, describe(a))),
            (None, Some(b)) => Some(format!("variable {}: {} only on the right", idx + 1, describe(b))),
            (None, None) => None,
        })
        .collect()
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        other => (other as char).to_string(),
    }
}
