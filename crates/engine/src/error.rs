use std::fmt;

#[derive(Debug)]
pub enum EngineError {
    /// TOML parse / deserialization error.
    ProfileParse(String),
    /// Profile validation error (empty keyword list, bad window, etc.).
    ProfileValidation(String),
    /// No required column label matched any keyword.
    ColumnNotFound {
        table: String,
        field: String,
        keywords: Vec<String>,
        available: Vec<String>,
    },
    /// A source grid has no data rows after the header.
    EmptySheet { table: String },
    /// A cell survived stripping but is not a valid number.
    NumericParse {
        table: String,
        field: String,
        row: usize,
        value: String,
    },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProfileParse(msg) => write!(f, "profile parse error: {msg}"),
            Self::ProfileValidation(msg) => write!(f, "profile validation error: {msg}"),
            Self::ColumnNotFound { table, field, keywords, available } => {
                write!(
                    f,
                    "table '{table}': no column for '{field}' (tried {}; columns: {})",
                    keywords.join(", "),
                    available.join(", "),
                )
            }
            Self::EmptySheet { table } => write!(f, "table '{table}': no data rows"),
            Self::NumericParse { table, field, row, value } => {
                write!(
                    f,
                    "table '{table}', row {row}: cannot parse {field} value '{value}'"
                )
            }
        }
    }
}

impl std::error::Error for EngineError {}
