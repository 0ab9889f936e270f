use anyhow::{anyhow, Context};
use chrono::{Duration, NaiveDateTime};
use rs422core::ingest::REQUIRED_FIELDS;
use rs422core::parameters::ParameterTable;
use rs422core::prelude::TIMESTAMP_FORMAT;

const TEMPLATE_ROWS: usize = 5;

/// Builds an importable example file: a short sweep across the normal band
/// of every configured parameter, one sample per minute starting at `start`.
pub fn sample_csv(table: &ParameterTable, start: NaiveDateTime) -> anyhow::Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(REQUIRED_FIELDS)?;

    for config in table.iter() {
        let span = config.normal_max - config.normal_min;
        for step in 0..TEMPLATE_ROWS {
            let timestamp = start + Duration::minutes(step as i64);
            let value = config.normal_min + span * step as f64 / (TEMPLATE_ROWS - 1) as f64;
            writer.write_record([
                timestamp.format(TIMESTAMP_FORMAT).to_string(),
                config.name.clone(),
                format!("{value:.2}"),
            ])?;
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| anyhow!("flushing sample csv: {}", err.error()))?;
    String::from_utf8(bytes).context("sample csv is not utf-8")
}
