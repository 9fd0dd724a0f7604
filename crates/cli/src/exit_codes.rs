//! CLI Exit Code Registry
//!
//! Single source of truth for all `sbridge` exit codes. Exit codes are part
//! of the shell contract; batch scripts and schedulers branch on them.
//!
//! | Code | Meaning                                               |
//! |------|-------------------------------------------------------|
//! | 0    | Success                                               |
//! | 1    | General error (unspecified)                           |
//! | 2    | Usage error (bad flags, unreadable/invalid profile)   |
//! | 3    | Input error (source unreadable, sheet missing, empty) |
//! | 4    | Column resolution failed (no label matched a keyword) |
//! | 5    | Data error (numeric coercion failed)                  |
//! | 6    | Fetch error (mapping download failed)                 |
//! | 7    | Output error (workbook/CSV write failed)              |
//!
//! New codes get a constant here, a row in the table, and wiring in the
//! relevant command's error handling.

use settlebridge_engine::EngineError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options, broken profile.
pub const EXIT_USAGE: u8 = 2;

/// Input error - source file unreadable, named sheet absent, empty grid.
pub const EXIT_INPUT: u8 = 3;

/// Column resolution error - a required column matched no keyword.
pub const EXIT_COLUMNS: u8 = 4;

/// Data error - a quantity or amount cell failed numeric coercion.
pub const EXIT_DATA: u8 = 5;

/// Fetch error - mapping-sheet download failed (auth, rate limit, network).
pub const EXIT_FETCH: u8 = 6;

/// Output error - writing the result workbook or CSV failed.
pub const EXIT_OUTPUT: u8 = 7;

/// Map an engine error to its exit code.
pub fn engine_exit_code(err: &EngineError) -> u8 {
    match err {
        EngineError::ProfileParse(_) | EngineError::ProfileValidation(_) => EXIT_USAGE,
        EngineError::ColumnNotFound { .. } => EXIT_COLUMNS,
        EngineError::EmptySheet { .. } => EXIT_INPUT,
        EngineError::NumericParse { .. } => EXIT_DATA,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_errors_map_to_documented_codes() {
        let err = EngineError::ColumnNotFound {
            table: "settlement".into(),
            field: "amount".into(),
            keywords: vec!["정산대상액".into()],
            available: vec!["금액".into()],
        };
        assert_eq!(engine_exit_code(&err), EXIT_COLUMNS);

        let err = EngineError::EmptySheet { table: "mapping".into() };
        assert_eq!(engine_exit_code(&err), EXIT_INPUT);

        let err = EngineError::NumericParse {
            table: "settlement".into(),
            field: "quantity".into(),
            row: 3,
            value: "1-2-3".into(),
        };
        assert_eq!(engine_exit_code(&err), EXIT_DATA);

        let err = EngineError::ProfileParse("bad toml".into());
        assert_eq!(engine_exit_code(&err), EXIT_USAGE);
    }
}
