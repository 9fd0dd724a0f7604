// Excel import (xlsx, xls, xlsb, ods) and export (xlsx only)
//
// Import: one-way conversion into the engine's string grid. Cell types
// collapse to the text a spreadsheet user would see.
// Export: the fixed ERP import layout, one sheet per file.

use std::io::{Cursor, Read, Seek};
use std::path::Path;

use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Reader, Sheets};
use rust_xlsxwriter::{Color, Format, Workbook as XlsxWorkbook};
use settlebridge_engine::grid::Grid;
use settlebridge_engine::model::OutputRow;
use settlebridge_engine::output::HEADER_LABELS;

/// Result of an ERP workbook export
#[derive(Debug, Default)]
pub struct ExportSummary {
    pub rows_written: usize,
    /// Rows whose name cell was painted red for manual review
    pub flagged_rows: usize,
}

/// Import one sheet of an Excel file as a string grid.
///
/// `sheet` selects a sheet by exact name; `None` takes the first sheet.
pub fn import_grid(path: &Path, sheet: Option<&str>) -> Result<Grid, String> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| format!("Failed to open Excel file: {}", e))?;
    grid_from_workbook(&mut workbook, sheet)
}

/// Import from an in-memory Excel file, e.g. a fetched mapping table.
pub fn import_grid_from_bytes(bytes: Vec<u8>, sheet: Option<&str>) -> Result<Grid, String> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| format!("Failed to open Excel data: {}", e))?;
    grid_from_workbook(&mut workbook, sheet)
}

fn grid_from_workbook<RS: Read + Seek>(
    workbook: &mut Sheets<RS>,
    sheet: Option<&str>,
) -> Result<Grid, String> {
    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    if sheet_names.is_empty() {
        return Err("Excel file contains no sheets".to_string());
    }

    let target = match sheet {
        Some(name) => sheet_names
            .iter()
            .find(|n| n.as_str() == name)
            .cloned()
            .ok_or_else(|| {
                format!(
                    "No sheet named '{}' (available: {})",
                    name,
                    sheet_names.join(", ")
                )
            })?,
        None => sheet_names[0].clone(),
    };

    let range = workbook
        .worksheet_range(&target)
        .map_err(|e| format!("Failed to read sheet '{}': {}", target, e))?;

    let mut rows: Vec<Vec<String>> = range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect();

    // Trailing blank rows are common scroll residue, not data
    while rows.last().is_some_and(|r| r.iter().all(String::is_empty)) {
        rows.pop();
    }

    Ok(Grid::new(rows))
}

/// Render a calamine cell the way it reads on screen.
///
/// Whole floats print without the decimal point so numeric product codes
/// survive the float round-trip as plain digits.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(n) => {
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                format!("{}", n)
            }
        }
        Data::Int(n) => format!("{}", n),
        Data::Bool(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
        Data::Error(e) => format!("#{:?}", e),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(naive) => {
                if naive.time() == chrono::NaiveTime::MIN {
                    naive.format("%Y-%m-%d").to_string()
                } else {
                    naive.format("%Y-%m-%d %H:%M:%S").to_string()
                }
            }
            None => format!("{}", dt.as_f64()),
        },
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}

/// Write output rows as the ERP import workbook.
///
/// Layout follows `HEADER_LABELS`: quantity and price are numeric cells,
/// everything else text. Fallback rows get their name painted red so a
/// reviewer can spot unmapped products before importing.
pub fn export_result(rows: &[OutputRow], path: &Path) -> Result<ExportSummary, String> {
    let mut workbook = XlsxWorkbook::new();
    let worksheet = workbook
        .add_worksheet()
        .set_name("Sheet1")
        .map_err(|e| format!("Failed to create sheet: {}", e))?;

    let header_format = Format::new().set_bold();
    let review_format = Format::new().set_font_color(Color::RGB(0xFF0000));

    for (col, label) in HEADER_LABELS.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *label, &header_format)
            .map_err(|e| format!("Failed to write header '{}': {}", label, e))?;
    }

    let mut summary = ExportSummary::default();
    for (idx, row) in rows.iter().enumerate() {
        let at = (idx + 1) as u32;
        let write_err = |e| format!("Failed to write row {}: {}", idx + 1, e);

        worksheet
            .write_string(at, 0, &row.date)
            .map_err(write_err)?;
        worksheet
            .write_string(at, 1, &row.counterparty)
            .map_err(write_err)?;
        worksheet
            .write_string(at, 2, &row.code)
            .map_err(write_err)?;
        if row.used_fallback {
            worksheet
                .write_string_with_format(at, 3, &row.name, &review_format)
                .map_err(write_err)?;
            summary.flagged_rows += 1;
        } else {
            worksheet
                .write_string(at, 3, &row.name)
                .map_err(write_err)?;
        }
        worksheet
            .write_number(at, 4, row.quantity as f64)
            .map_err(write_err)?;
        worksheet
            .write_number(at, 5, row.unit_price as f64)
            .map_err(write_err)?;
        if !row.remark.is_empty() {
            worksheet
                .write_string(at, 6, &row.remark)
                .map_err(write_err)?;
        }

        summary.rows_written += 1;
    }

    workbook
        .save(path)
        .map_err(|e| format!("Failed to save XLSX file: {}", e))?;

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_floats_print_as_integers() {
        assert_eq!(cell_text(&Data::Float(81234567.0)), "81234567");
        assert_eq!(cell_text(&Data::Float(-3.0)), "-3");
        assert_eq!(cell_text(&Data::Float(2.5)), "2.5");
    }

    #[test]
    fn non_text_cells_render_readably() {
        assert_eq!(cell_text(&Data::Empty), "");
        assert_eq!(cell_text(&Data::Int(42)), "42");
        assert_eq!(cell_text(&Data::Bool(true)), "TRUE");
        assert_eq!(cell_text(&Data::String("위젯".to_string())), "위젯");
    }

    #[test]
    fn missing_file_reports_open_failure() {
        let err = import_grid(Path::new("/nonexistent/settlement.xlsx"), None).unwrap_err();
        assert!(err.contains("Failed to open"), "got: {err}");
    }
}
