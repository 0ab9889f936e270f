/// Header fields every imported telemetry table must carry.
pub const REQUIRED_FIELDS: [&str; 3] = ["Timestamp", "Parameter", "Value"];

/// The input table lacks one or more required header fields.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "missing required field(s) {}; expected columns: {}",
    .missing.join(", "),
    REQUIRED_FIELDS.join(", ")
)]
pub struct SchemaError {
    pub missing: Vec<&'static str>,
}

/// A record could not be converted into a measurement.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("line {line}: could not parse timestamp {value:?}, expected YYYY-MM-DD HH:MM:SS")]
    Timestamp { line: u64, value: String },
    #[error("line {line}: value {value:?} is not numeric")]
    Value { line: u64, value: String },
    #[error("malformed record{}: {}", line_suffix(.line), .message)]
    Record { line: Option<u64>, message: String },
}

fn line_suffix(line: &Option<u64>) -> String {
    line.map(|l| format!(" at line {l}")).unwrap_or_default()
}

/// Whole-file rejection of an import; no partial result is ever produced.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ImportError {
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|pos| pos.line());
        ImportError::Parse(ParseError::Record {
            line,
            message: err.to_string(),
        })
    }
}

pub type ImportResult<T> = Result<T, ImportError>;
