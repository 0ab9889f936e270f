use crate::ingest::error::{ImportResult, ParseError, SchemaError, REQUIRED_FIELDS};
use crate::prelude::{SeriesRow, TIMESTAMP_FORMAT};
use chrono::NaiveDateTime;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::io::Read;

struct Columns {
    timestamp: usize,
    parameter: usize,
    value: usize,
}

impl Columns {
    fn locate(headers: &StringRecord) -> Result<Self, SchemaError> {
        let position = |field: &str| {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}') == field)
        };

        let found = REQUIRED_FIELDS.map(position);
        let missing = REQUIRED_FIELDS
            .iter()
            .zip(found.iter())
            .filter(|(_, index)| index.is_none())
            .map(|(field, _)| *field)
            .collect::<Vec<_>>();

        match found {
            [Some(timestamp), Some(parameter), Some(value)] => Ok(Self {
                timestamp,
                parameter,
                value,
            }),
            _ => Err(SchemaError { missing }),
        }
    }
}

/// Reads a comma-delimited telemetry table with `Timestamp`, `Parameter`
/// and `Value` header fields.
///
/// The whole input is parsed before anything is returned: the first schema
/// or parse failure rejects the file and no rows escape.
pub fn read_series<R: Read>(input: R) -> ImportResult<Vec<SeriesRow>> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(input);
    let columns = Columns::locate(reader.headers()?)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|pos| pos.line()).unwrap_or_default();
        rows.push(parse_record(&record, &columns, line)?);
    }
    Ok(rows)
}

pub fn parse_series_csv(text: &str) -> ImportResult<Vec<SeriesRow>> {
    read_series(text.as_bytes())
}

fn parse_record(record: &StringRecord, columns: &Columns, line: u64) -> ImportResult<SeriesRow> {
    let field = |index: usize| record.get(index).unwrap_or_default();

    let raw_timestamp = field(columns.timestamp);
    let timestamp = NaiveDateTime::parse_from_str(raw_timestamp, TIMESTAMP_FORMAT).map_err(|_| {
        ParseError::Timestamp {
            line,
            value: raw_timestamp.to_string(),
        }
    })?;

    let raw_value = field(columns.value);
    let value = raw_value.parse::<f64>().map_err(|_| ParseError::Value {
        line,
        value: raw_value.to_string(),
    })?;

    Ok(SeriesRow::new(timestamp, field(columns.parameter), value))
}
