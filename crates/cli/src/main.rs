// Funnel CLI - review verification and funnel reporting, headless

mod analytics;
mod columns;
mod customers;
mod exit_codes;
mod export;
mod verify;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use funnel_io::{UploadError, UploadFormat};
use funnel_verify::VerifyError;

use exit_codes::{
    config_exit_code, upload_exit_code, EXIT_ERROR, EXIT_INPUT, EXIT_SUCCESS, EXIT_USAGE,
};

#[derive(Parser)]
#[command(name = "funnel")]
#[command(about = "Verify funnel-generated reviews against marketplace exports")]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    /// Log progress to stderr (RUST_LOG overrides)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Match generated reviews against an uploaded marketplace export
    #[command(after_help = "\
Customers are read from a JSON array of customer records. The upload is a
CSV/TSV or spreadsheet export with a review text column (reviewDescription,
Review Text, body, content) and optional rating, title and date columns.

Examples:
  funnel verify customers.json reviews.csv
  funnel verify customers.json reviews.xlsx --json
  funnel verify customers.json export.txt --format csv --delimiter ';'
  funnel verify customers.json reviews.csv --config verify.toml --csv matches.csv")]
    Verify {
        /// Customer records (JSON array)
        customers: PathBuf,

        /// Marketplace review export (csv, tsv, xlsx, xls, ods)
        reviews: PathBuf,

        /// Upload format (inferred from extension if not specified)
        #[arg(long, short = 'f')]
        format: Option<UploadKind>,

        /// Field delimiter for delimited text (sniffed if not specified)
        #[arg(long)]
        delimiter: Option<char>,

        /// Thresholds / tokenizer config (TOML)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output JSON to stdout
        #[arg(long)]
        json: bool,

        /// Write JSON output to file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Write the match table as CSV to file
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Show the headers of an upload and the column picked for each role
    #[command(after_help = "\
Exit code 5 means no column could serve as the review text.

Examples:
  funnel columns reviews.csv
  funnel columns reviews.xlsx --json")]
    Columns {
        /// Marketplace review export
        file: PathBuf,

        /// Upload format (inferred from extension if not specified)
        #[arg(long, short = 'f')]
        format: Option<UploadKind>,

        /// Field delimiter for delimited text (sniffed if not specified)
        #[arg(long)]
        delimiter: Option<char>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Funnel conversion analytics over customer records
    #[command(after_help = "\
Examples:
  funnel analytics customers.json
  funnel analytics customers.json --json")]
    Analytics {
        /// Customer records (JSON array)
        customers: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export customer records as CSV
    #[command(after_help = "\
Examples:
  funnel export customers.json
  funnel export customers.json -o customers.csv")]
    Export {
        /// Customer records (JSON array)
        customers: PathBuf,

        /// Output file (omit for stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum UploadKind {
    Csv,
    Tsv,
    Xlsx,
}

/// Resolve the upload format from the flags, falling back to the extension.
fn upload_format(
    path: &Path,
    kind: Option<UploadKind>,
    delimiter: Option<char>,
) -> Result<UploadFormat, CliError> {
    let format = match kind {
        Some(UploadKind::Csv) => UploadFormat::Delimited { delimiter: None },
        Some(UploadKind::Tsv) => UploadFormat::Delimited { delimiter: Some('\t') },
        Some(UploadKind::Xlsx) => UploadFormat::Spreadsheet,
        None => UploadFormat::from_file_name(path),
    };
    match (format, delimiter) {
        (UploadFormat::Spreadsheet, Some(_)) => Err(CliError::args(
            "--delimiter only applies to delimited text uploads",
        )
        .with_hint("drop --delimiter, or pass --format csv for text exports")),
        (UploadFormat::Delimited { .. }, Some(d)) => Ok(UploadFormat::Delimited { delimiter: Some(d) }),
        (format, None) => Ok(format),
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        None => {
            // No subcommand = show help
            eprintln!("Usage: funnel <command> [options]");
            eprintln!("       funnel --help for more information");
            Ok(())
        }
        Some(Commands::Verify { customers, reviews, format, delimiter, config, json, output, csv }) => {
            upload_format(&reviews, format, delimiter).and_then(|format| {
                verify::cmd_verify(verify::VerifyArgs {
                    customers,
                    reviews,
                    format,
                    config,
                    json,
                    output,
                    csv,
                })
            })
        }
        Some(Commands::Columns { file, format, delimiter, json }) => {
            upload_format(&file, format, delimiter)
                .and_then(|format| columns::cmd_columns(file, format, json))
        }
        Some(Commands::Analytics { customers, json }) => analytics::cmd_analytics(customers, json),
        Some(Commands::Export { customers, output }) => export::cmd_export(customers, output),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn input(msg: impl Into<String>) -> Self {
        Self { code: EXIT_INPUT, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    /// Create error from an upload error with proper exit code.
    pub fn upload(err: UploadError) -> Self {
        let code = upload_exit_code(&err);
        let hint = match &err {
            UploadError::EmptyInput => {
                Some("the first row must be a header row followed by review rows".to_string())
            }
            UploadError::MissingColumn { found, .. } => Some(format!(
                "rename the review column to one of reviewDescription, Review Text, body, content (found: {})",
                found.join(", ")
            )),
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }

    /// Create error from a config error with proper exit code.
    pub fn config(err: VerifyError) -> Self {
        let code = config_exit_code(&err);
        let hint = match &err {
            VerifyError::ConfigValidation(_) => {
                Some("thresholds must satisfy 0 <= probable <= confirmed <= 1".to_string())
            }
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
