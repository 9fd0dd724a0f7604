//! `sbridge build`: run the conversion and write the ERP workbook.

use std::path::{Path, PathBuf};

use settlebridge_engine::{run, Grid, OutputRow};

use crate::exit_codes::EXIT_ERROR;
use crate::fetch;
use crate::CliError;

const MAPPING_ENV: &str = "SBRIDGE_MAPPING_URL";

pub fn cmd_build(
    main: PathBuf,
    sheet: Option<String>,
    mapping: Option<String>,
    profile: Option<PathBuf>,
    out: PathBuf,
    json: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let profile = crate::load_profile(profile)?;
    let mapping_source = resolve_mapping_source(mapping, MAPPING_ENV)?;

    let main_path = crate::expand_path(&main);
    let main_grid = crate::load_grid(&main_path, sheet.as_deref())?;
    let mapping_grid = load_mapping_grid(&mapping_source, quiet)?;

    let result = run(&profile, &main_grid, &mapping_grid).map_err(CliError::engine)?;

    let out_path = crate::expand_path(&out);
    write_output(&result.rows, &out_path)?;

    if json {
        let output = serde_json::to_string_pretty(&result).map_err(|e| CliError {
            code: EXIT_ERROR,
            message: format!("cannot serialize result: {}", e),
            hint: None,
        })?;
        println!("{}", output);
    } else if !quiet {
        let flagged = result.rows.iter().filter(|r| r.used_fallback).count();
        eprintln!(
            "wrote {}: {} rows ({} fallback) from {} settlement lines",
            out_path.display(),
            result.summary.output_rows,
            flagged,
            result.summary.main_rows,
        );
    }

    Ok(())
}

/// Resolve the mapping source: flag value > environment variable > error.
fn resolve_mapping_source(flag: Option<String>, env_var: &str) -> Result<String, CliError> {
    let missing = || {
        CliError::usage("missing mapping source")
            .with_hint(format!("pass --mapping <path-or-url> or set {}", env_var))
    };

    if let Some(src) = flag {
        let trimmed = src.trim().to_string();
        if trimmed.is_empty() {
            return Err(missing());
        }
        return Ok(trimmed);
    }

    if let Ok(src) = std::env::var(env_var) {
        let trimmed = src.trim().to_string();
        if !trimmed.is_empty() {
            return Ok(trimmed);
        }
    }

    Err(missing())
}

/// Load the mapping grid: http(s) sources are downloaded and read as xlsx,
/// anything else is a local file.
fn load_mapping_grid(source: &str, quiet: bool) -> Result<Grid, CliError> {
    if source.starts_with("http://") || source.starts_with("https://") {
        if !quiet {
            eprintln!("fetching mapping sheet from {}", source);
        }
        let bytes = fetch::fetch_bytes(source)?;
        settlebridge_io::xlsx::import_grid_from_bytes(bytes, None).map_err(CliError::input)
    } else {
        let path = crate::expand_path(Path::new(source));
        crate::load_grid(&path, None)
    }
}

fn write_output(rows: &[OutputRow], path: &Path) -> Result<(), CliError> {
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

    if is_csv {
        settlebridge_io::csv::export_result(rows, path).map_err(CliError::output)
    } else {
        settlebridge_io::xlsx::export_result(rows, path)
            .map(|_| ())
            .map_err(CliError::output)
    }
}
