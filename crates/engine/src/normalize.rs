//! Cell text canonicalization: join keys and noisy numbers.

/// Invisible characters that survive copy-paste from spreadsheet UIs.
const INVISIBLES: [char; 2] = ['\u{200b}', '\u{feff}'];

/// Canonicalize an identifier cell for matching.
///
/// Strips zero-width space / BOM characters, removes every whitespace
/// character (removal, not compaction), and lowercases. Two cells with the
/// same normalized form are the same entity regardless of surface formatting.
/// Idempotent.
pub fn normalize_key(value: &str) -> String {
    value
        .chars()
        .filter(|c| !INVISIBLES.contains(c) && !c.is_whitespace())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

/// Coerce a noisy cell to a number.
///
/// Keeps only digits, `.` and `-`; an empty remainder is 0 (blank cells,
/// pure-text cells). Tolerates currency symbols, thousands separators, and
/// surrounding text. Returns `None` when the stripped remainder still fails
/// to parse (e.g. stray `-` in the middle); callers treat that as fatal
/// rather than letting NaN into the pipeline.
pub fn to_number(value: &str) -> Option<f64> {
    let cleaned: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    if cleaned.is_empty() {
        return Some(0.0);
    }

    cleaned.parse::<f64>().ok()
}
