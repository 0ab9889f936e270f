pub mod error;
pub mod import;
pub mod reader;

pub use error::{ImportError, ImportResult, ParseError, SchemaError, REQUIRED_FIELDS};
pub use import::{import, DisplayRecord};
pub use reader::{parse_series_csv, read_series};

use crate::parameters::ParameterTable;
use std::collections::BTreeMap;
use std::io::Read;

/// Parses a telemetry table and imports it against `table` in one step.
pub fn import_csv<R: Read>(
    input: R,
    table: &ParameterTable,
) -> ImportResult<BTreeMap<String, DisplayRecord>> {
    let rows = read_series(input)?;
    Ok(import(&rows, table))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn import_csv_combines_parsing_and_grouping() {
        let text = "Timestamp,Parameter,Value\n\
                    2024-01-01 10:05:00,Temperature,20\n\
                    2024-01-01 10:00:00,Temperature,18\n\
                    2024-01-01 10:00:00,Pressure,1012\n";
        let records = import_csv(text.as_bytes(), &ParameterTable::builtin()).unwrap();
        assert_eq!(records.keys().collect::<Vec<_>>(), vec!["Temperature"]);
        assert_eq!(records["Temperature"].values, vec![18.0, 20.0]);
    }

    #[test]
    fn import_csv_without_value_column_is_rejected() {
        let text = "Timestamp,Parameter\n2024-01-01 10:00:00,Temperature\n";
        let err = import_csv(text.as_bytes(), &ParameterTable::builtin()).unwrap_err();
        assert!(matches!(err, ImportError::Schema(SchemaError { ref missing }) if missing == &["Value"]));
    }
}
