//! `sbridge inspect`: header detection and column binding diagnostics.
//!
//! Shows what `build` would see before running anything: the detected
//! header row, which column each semantic field bound to, and a preview
//! of the bound cells. Binding failures exit with the normal column
//! error so scripts can probe a source without converting it.

use std::path::PathBuf;

use settlebridge_engine::columns::{MainColumns, MappingColumns};
use settlebridge_engine::grid::{detect_header_row, Table};

use crate::CliError;

const PREVIEW_ROWS: usize = 5;
const PREVIEW_CELL_CHARS: usize = 20;

pub fn cmd_inspect(
    source: PathBuf,
    sheet: Option<String>,
    profile: Option<PathBuf>,
    mapping_table: bool,
) -> Result<(), CliError> {
    let profile = crate::load_profile(profile)?;
    let path = crate::expand_path(&source);
    let grid = crate::load_grid(&path, sheet.as_deref())?;

    let role = if mapping_table { "mapping" } else { "settlement" };
    let keywords = if mapping_table {
        profile.mapping_keywords.header_keywords()
    } else {
        profile.main_keywords.header_keywords()
    };

    let header_idx = detect_header_row(&grid, &keywords, profile.search_rows);
    let table = Table::from_grid(&grid, header_idx);

    println!("Source:     {}", path.display());
    if let Some(name) = &sheet {
        println!("Sheet:      {}", name);
    }
    println!("Profile:    {}", profile.name);
    println!("Role:       {}", role);
    println!(
        "Header row: {} ({} rows in grid, {} data rows)",
        header_idx,
        grid.row_count(),
        table.row_count(),
    );

    let bindings = if mapping_table {
        let cols =
            MappingColumns::resolve(&table, &profile.mapping_keywords).map_err(CliError::engine)?;
        vec![
            ("option_id", cols.option_id),
            ("code", cols.code),
            ("name", cols.name),
        ]
    } else {
        let cols = MainColumns::resolve(&table, &profile.main_keywords).map_err(CliError::engine)?;
        vec![
            ("option_id", cols.option_id),
            ("date", cols.date),
            ("quantity", cols.quantity),
            ("amount", cols.amount),
            ("registered_name", cols.registered_name),
        ]
    };

    println!("\nColumns:");
    for (field, idx) in &bindings {
        let label = table.labels.get(*idx).map(String::as_str).unwrap_or("");
        println!("  {:<16} -> #{:<3} {:?}", field, idx, label);
    }

    println!("\nPreview:");
    if table.row_count() == 0 {
        println!("  (no data rows)");
    }
    for row in 0..table.row_count().min(PREVIEW_ROWS) {
        let cells: Vec<String> = bindings
            .iter()
            .map(|(_, idx)| preview_cell(table.cell(row, *idx)))
            .collect();
        println!("  [{}] {}", row, cells.join(" | "));
    }

    Ok(())
}

fn preview_cell(cell: &str) -> String {
    if cell.chars().count() > PREVIEW_CELL_CHARS {
        let cut: String = cell.chars().take(PREVIEW_CELL_CHARS - 1).collect();
        format!("{}…", cut)
    } else {
        cell.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_cells_pass_through() {
        assert_eq!(preview_cell("위젯"), "위젯");
        assert_eq!(preview_cell(""), "");
    }

    #[test]
    fn long_cells_truncate_on_char_boundaries() {
        let long = "가".repeat(30);
        let shown = preview_cell(&long);
        assert_eq!(shown.chars().count(), PREVIEW_CELL_CHARS);
        assert!(shown.ends_with('…'));
    }
}
