use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about = "Manage per-column CSV import options", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Sample a CSV file and write a starting options file
    Detect(DetectArgs),
    /// Change the data type of one or more variables in an options file
    Reclassify(ReclassifyArgs),
    /// Compare two options files variable by variable
    Compare(CompareArgs),
    /// Clean raw CSV fields using quote, affix, missing, and empty-field rules
    Normalize(NormalizeArgs),
}

#[derive(Debug, Args)]
pub struct DetectArgs {
    /// Input CSV file to inspect
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Destination options file (.yaml, or .json)
    #[arg(short, long)]
    pub meta: PathBuf,
    /// Number of rows to sample (0 means full scan)
    #[arg(long, default_value_t = 2000)]
    pub sample_rows: usize,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct ReclassifyArgs {
    /// Options file to update
    #[arg(short, long)]
    pub meta: PathBuf,
    /// Write the result here instead of overwriting the input
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Variables to change, by name (repeatable, comma-separated)
    #[arg(short = 'C', long = "column", value_delimiter = ',', action = clap::ArgAction::Append)]
    pub columns: Vec<String>,
    /// Variables to change, by 1-based position (repeatable, comma-separated)
    #[arg(short = 'p', long = "position", value_delimiter = ',', action = clap::ArgAction::Append)]
    pub positions: Vec<usize>,
    /// Target type, either one for all variables or one per variable
    /// (positions first, then names, each in the order given)
    #[arg(short = 't', long = "type", value_delimiter = ',', action = clap::ArgAction::Append, required = true)]
    pub types: Vec<String>,
}

#[derive(Debug, Args)]
pub struct CompareArgs {
    /// First options file
    pub left: PathBuf,
    /// Second options file
    pub right: PathBuf,
}

#[derive(Debug, Args)]
pub struct NormalizeArgs {
    /// Input CSV file (use '-' for stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Options file describing each column
    #[arg(short, long)]
    pub meta: PathBuf,
    /// Output CSV file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Text written for missing fields
    #[arg(long = "missing-token", default_value = "")]
    pub missing_token: String,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            if first == '"' {
                return Err("Delimiter cannot be the quote character".to_string());
            }
            Ok(first as u8)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delimiter_aliases() {
        assert_eq!(parse_delimiter("tab"), Ok(b'\t'));
        assert_eq!(parse_delimiter("pipe"), Ok(b'|'));
        assert_eq!(parse_delimiter(":"), Ok(b':'));
        assert!(parse_delimiter("\"").is_err());
        assert!(parse_delimiter("ab").is_err());
        assert!(parse_delimiter("").is_err());
    }
}
