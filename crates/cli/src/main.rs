// SettleBridge CLI - marketplace settlement conversion, headless

mod build;
mod exit_codes;
mod fetch;
mod inspect;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use settlebridge_engine::{ConvertProfile, EngineError, Grid};

use exit_codes::{engine_exit_code, EXIT_INPUT, EXIT_OUTPUT, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "sbridge")]
#[command(about = "Convert marketplace settlement exports into ERP import workbooks")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Join a settlement export with the product-mapping sheet and write
    /// the ERP import workbook
    #[command(after_help = "\
The mapping source is resolved from --mapping, then from the
SBRIDGE_MAPPING_URL environment variable. http(s) sources are downloaded
and read as xlsx; anything else is a local path.

Examples:
  sbridge build settlement.xlsx --mapping products.xlsx
  sbridge build settlement.csv --mapping ~/sheets/products.xlsx -o january.xlsx
  sbridge build settlement.xlsx --sheet 'DeliveryFee' --out report.csv
  sbridge build settlement.xlsx --profile smartstore.toml --json
  SBRIDGE_MAPPING_URL='https://docs.google.com/.../export?format=xlsx' \\
      sbridge build settlement.xlsx")]
    Build {
        /// Settlement export (xlsx, xls, xlsb, ods, or csv/tsv)
        main: PathBuf,

        /// Sheet name inside the settlement workbook (default: first sheet)
        #[arg(long)]
        sheet: Option<String>,

        /// Mapping sheet: local path or http(s) URL
        #[arg(long, value_name = "SRC")]
        mapping: Option<String>,

        /// Conversion profile TOML (default: built-in Coupang jet profile)
        #[arg(long, short = 'p')]
        profile: Option<PathBuf>,

        /// Output path; .csv writes CSV, anything else writes xlsx
        #[arg(long, short = 'o', default_value = "result_output.xlsx")]
        out: PathBuf,

        /// Print the full conversion result as JSON to stdout
        #[arg(long)]
        json: bool,

        /// Suppress the stderr summary
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Show header detection and column bindings for a source file
    #[command(after_help = "\
Examples:
  sbridge inspect settlement.xlsx
  sbridge inspect settlement.xlsx --sheet 'DeliveryFee'
  sbridge inspect products.xlsx --mapping-table
  sbridge inspect settlement.csv --profile smartstore.toml")]
    Inspect {
        /// Source file (xlsx, xls, xlsb, ods, or csv/tsv)
        source: PathBuf,

        /// Sheet name inside the workbook (default: first sheet)
        #[arg(long)]
        sheet: Option<String>,

        /// Conversion profile TOML (default: built-in Coupang jet profile)
        #[arg(long, short = 'p')]
        profile: Option<PathBuf>,

        /// Inspect as the product-mapping table instead of the settlement table
        #[arg(long)]
        mapping_table: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Build { main, sheet, mapping, profile, out, json, quiet } => {
            build::cmd_build(main, sheet, mapping, profile, out, json, quiet)
        }
        Commands::Inspect { source, sheet, profile, mapping_table } => {
            inspect::cmd_inspect(source, sheet, profile, mapping_table)
        }
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
    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn input(msg: impl Into<String>) -> Self {
        Self { code: EXIT_INPUT, message: msg.into(), hint: None }
    }

    pub fn output(msg: impl Into<String>) -> Self {
        Self { code: EXIT_OUTPUT, message: msg.into(), hint: None }
    }

    /// Create error from engine error with proper exit code.
    pub fn engine(err: EngineError) -> Self {
        let code = engine_exit_code(&err);
        let hint = match &err {
            EngineError::ColumnNotFound { .. } => Some(
                "override the keyword lists in a profile file (--profile)".to_string(),
            ),
            EngineError::EmptySheet { .. } => {
                Some("check --sheet; the selected sheet has no data rows".to_string())
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

// ============================================================================
// Shared source loading
// ============================================================================

/// Load a conversion profile: TOML file when given, built-in default otherwise.
pub(crate) fn load_profile(path: Option<PathBuf>) -> Result<ConvertProfile, CliError> {
    match path {
        None => Ok(ConvertProfile::default()),
        Some(path) => {
            let expanded = expand_path(&path);
            let content = std::fs::read_to_string(&expanded).map_err(|e| {
                CliError::usage(format!("cannot read profile {}: {}", expanded.display(), e))
            })?;
            ConvertProfile::from_toml(&content).map_err(CliError::engine)
        }
    }
}

/// Read a source file into a grid. csv/tsv go through the delimiter
/// sniffer; everything else is opened as a workbook.
pub(crate) fn load_grid(path: &Path, sheet: Option<&str>) -> Result<Grid, CliError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match ext.as_deref() {
        Some("csv") | Some("tsv") | Some("txt") => {
            settlebridge_io::csv::import_grid(path).map_err(CliError::input)
        }
        _ => settlebridge_io::xlsx::import_grid(path, sheet).map_err(CliError::input),
    }
}

pub(crate) fn expand_path(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).to_string())
}
