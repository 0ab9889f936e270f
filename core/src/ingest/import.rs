use crate::math::stats::SeriesStats;
use crate::parameters::{ParameterConfig, ParameterTable, StatusClass};
use crate::prelude::{SeriesRecord, SeriesRow};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A parameter's configuration merged with its time series, ready to render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayRecord {
    #[serde(flatten)]
    pub config: ParameterConfig,
    pub values: Vec<f64>,
    pub time_labels: Vec<String>,
}

impl DisplayRecord {
    pub fn from_series(config: ParameterConfig, series: &SeriesRecord) -> Self {
        Self {
            config,
            values: series.values.clone(),
            time_labels: series.time_labels(),
        }
    }

    pub fn current_value(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// Status of the latest sample, `Inactive` when the series is empty.
    pub fn current_status(&self) -> StatusClass {
        self.current_value()
            .map(|value| self.config.classify(value))
            .unwrap_or(StatusClass::Inactive)
    }

    pub fn point_statuses(&self) -> Vec<StatusClass> {
        self.values
            .iter()
            .map(|&value| self.config.classify(value))
            .collect()
    }

    pub fn stats(&self) -> Option<SeriesStats> {
        SeriesStats::from_values(&self.values)
    }
}

/// Groups imported rows by parameter and builds one display record each.
///
/// Rows naming a parameter absent from `table` are dropped. Within a group
/// rows are ordered by timestamp with a stable sort, so samples sharing a
/// timestamp keep their input order.
pub fn import(rows: &[SeriesRow], table: &ParameterTable) -> BTreeMap<String, DisplayRecord> {
    let mut groups: BTreeMap<&str, Vec<&SeriesRow>> = BTreeMap::new();
    for row in rows {
        if table.contains(&row.parameter) {
            groups.entry(row.parameter.as_str()).or_default().push(row);
        } else {
            debug!("dropping row for unknown parameter {:?}", row.parameter);
        }
    }

    groups
        .into_iter()
        .filter_map(|(name, mut group)| {
            let config = table.get(name)?;
            group.sort_by_key(|row| row.timestamp);

            let mut series = SeriesRecord::with_capacity(group.len());
            for row in group {
                series.push(row.timestamp, row.value);
            }
            Some((
                name.to_string(),
                DisplayRecord::from_series(config.clone(), &series),
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn import_sorts_each_group_by_timestamp() {
        let table = ParameterTable::builtin();
        let rows = vec![
            SeriesRow::new(at(10, 5), "Temperature", 20.0),
            SeriesRow::new(at(10, 0), "Temperature", 18.0),
        ];

        let records = import(&rows, &table);
        let temperature = &records["Temperature"];
        assert_eq!(temperature.values, vec![18.0, 20.0]);
        assert_eq!(temperature.time_labels, vec!["10:00", "10:05"]);
        assert_eq!(temperature.config.unit, "°C");
    }

    #[test]
    fn import_drops_unknown_parameters() {
        let table = ParameterTable::builtin();
        let rows = vec![
            SeriesRow::new(at(10, 0), "Pressure", 1013.0),
            SeriesRow::new(at(10, 0), "Voltage", 5.0),
        ];

        let records = import(&rows, &table);
        assert!(!records.contains_key("Pressure"));
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn import_of_only_unknown_rows_is_empty() {
        let rows = vec![SeriesRow::new(at(8, 0), "Pressure", 1.0)];
        assert!(import(&rows, &ParameterTable::builtin()).is_empty());
    }

    #[test]
    fn import_of_no_rows_is_empty() {
        assert!(import(&[], &ParameterTable::builtin()).is_empty());
    }

    #[test]
    fn equal_timestamps_keep_input_order() {
        let rows = vec![
            SeriesRow::new(at(9, 0), "Humidity", 50.0),
            SeriesRow::new(at(8, 0), "Humidity", 40.0),
            SeriesRow::new(at(9, 0), "Humidity", 51.0),
            SeriesRow::new(at(9, 0), "Humidity", 49.0),
        ];
        let records = import(&rows, &ParameterTable::builtin());
        assert_eq!(records["Humidity"].values, vec![40.0, 50.0, 51.0, 49.0]);
    }

    #[test]
    fn import_is_idempotent() {
        let table = ParameterTable::builtin();
        let rows = vec![
            SeriesRow::new(at(11, 30), "Resistance", 101.0),
            SeriesRow::new(at(11, 0), "Voltage", 4.7),
            SeriesRow::new(at(10, 0), "Resistance", 97.5),
            SeriesRow::new(at(10, 15), "Unknown", 3.0),
        ];

        let first = import(&rows, &table);
        let second = import(&rows, &table);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );
    }

    #[test]
    fn display_record_reports_current_status_and_stats() {
        let rows = vec![
            SeriesRow::new(at(10, 0), "Voltage", 5.0),
            SeriesRow::new(at(10, 1), "Voltage", 4.6),
            SeriesRow::new(at(10, 2), "Voltage", 5.9),
        ];
        let records = import(&rows, &ParameterTable::builtin());
        let voltage = &records["Voltage"];

        assert_eq!(voltage.current_value(), Some(5.9));
        assert_eq!(voltage.current_status(), StatusClass::Critical);
        assert_eq!(
            voltage.point_statuses(),
            vec![StatusClass::Normal, StatusClass::Warning, StatusClass::Critical]
        );
        let stats = voltage.stats().unwrap();
        assert_eq!(stats.min, 4.6);
        assert_eq!(stats.max, 5.9);
    }

    #[test]
    fn display_record_flattens_config_when_serialized() {
        let rows = vec![SeriesRow::new(at(10, 0), "Temperature", 22.0)];
        let records = import(&rows, &ParameterTable::builtin());
        let json = serde_json::to_value(&records["Temperature"]).unwrap();
        assert_eq!(json["normal_min"], 15.0);
        assert_eq!(json["values"][0], 22.0);
        assert_eq!(json["time_labels"][0], "10:00");
    }
}
