//! Raw cell grids and header-bound tables.
//!
//! A `Grid` is what a source read produces: rows of stringified cells with
//! no header identified yet. Header detection picks the label row, then
//! `Table::from_grid` re-materializes the grid with that row as column
//! labels and every earlier row discarded.

use crate::normalize::normalize_key;

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

/// An unheadered cell grid. Rows may be ragged; accessors treat missing
/// trailing cells as empty.
#[derive(Debug, Clone, Default)]
pub struct Grid {
    pub rows: Vec<Vec<String>>,
}

impl Grid {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

// ---------------------------------------------------------------------------
// Header detection
// ---------------------------------------------------------------------------

/// Find the header row: the first row within the search window where any
/// normalized keyword is a substring of any normalized cell.
///
/// Falls back to row 0 when nothing matches, so callers relying on
/// detection must pass keywords guaranteed to appear in the real header.
pub fn detect_header_row(grid: &Grid, keywords: &[String], search_rows: usize) -> usize {
    let targets: Vec<String> = keywords
        .iter()
        .map(|k| normalize_key(k))
        .filter(|k| !k.is_empty())
        .collect();

    for (idx, row) in grid.rows.iter().take(search_rows).enumerate() {
        let hit = row.iter().any(|cell| {
            let cell = normalize_key(cell);
            targets.iter().any(|t| cell.contains(t.as_str()))
        });
        if hit {
            return idx;
        }
    }

    0
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// A grid bound to a header row: label vector plus the data rows below it.
#[derive(Debug, Clone)]
pub struct Table {
    pub labels: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Bind `grid` to the header at `header_idx`. Rows above the header are
    /// dropped; rows below become the data rows.
    pub fn from_grid(grid: &Grid, header_idx: usize) -> Self {
        let labels = grid.rows.get(header_idx).cloned().unwrap_or_default();
        let rows = grid
            .rows
            .get(header_idx + 1..)
            .map(|r| r.to_vec())
            .unwrap_or_default();
        Self { labels, rows }
    }

    /// Cell text at (row, col); empty string when the row is short.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Grid {
        Grid::new(
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    fn kw(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn detects_first_matching_row() {
        let g = grid(&[
            &["정산 리포트", ""],
            &["2024-01 ~ 2024-02", ""],
            &["옵션ID", "정산대상액"],
            &["111", "3000"],
        ]);
        assert_eq!(detect_header_row(&g, &kw(&["옵션id", "정산대상액"]), 50), 2);
    }

    #[test]
    fn matches_keyword_as_substring_of_cell() {
        let g = grid(&[&["preamble"], &["상품 옵션ID 목록"]]);
        assert_eq!(detect_header_row(&g, &kw(&["옵션id"]), 50), 1);
    }

    #[test]
    fn defaults_to_row_zero_without_match() {
        let g = grid(&[&["a", "b"], &["c", "d"]]);
        assert_eq!(detect_header_row(&g, &kw(&["옵션id"]), 50), 0);
    }

    #[test]
    fn search_window_bounds_the_scan() {
        let g = grid(&[&["x"], &["y"], &["옵션ID"]]);
        assert_eq!(detect_header_row(&g, &kw(&["옵션id"]), 2), 0);
        assert_eq!(detect_header_row(&g, &kw(&["옵션id"]), 3), 2);
    }

    #[test]
    fn from_grid_discards_preamble_rows() {
        let g = grid(&[
            &["garbage"],
            &["옵션ID", "수량"],
            &["111", "2"],
            &["222", "1"],
        ]);
        let t = Table::from_grid(&g, 1);
        assert_eq!(t.labels, vec!["옵션ID", "수량"]);
        assert_eq!(t.row_count(), 2);
        assert_eq!(t.cell(0, 0), "111");
        assert_eq!(t.cell(1, 1), "1");
    }

    #[test]
    fn short_rows_read_as_empty_cells() {
        let g = grid(&[&["a", "b", "c"], &["1"]]);
        let t = Table::from_grid(&g, 0);
        assert_eq!(t.cell(0, 0), "1");
        assert_eq!(t.cell(0, 2), "");
        assert_eq!(t.cell(9, 0), "");
    }
}
