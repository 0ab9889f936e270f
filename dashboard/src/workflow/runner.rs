use crate::generator::profile::NormalSeriesGenerator;
use crate::gui_bridge::model::{DashboardModel, DataSource};
use crate::workflow::config::DashboardConfig;
use chrono::Local;
use log::{info, warn};
use rs422core::comms::LinkReport;
use rs422core::ingest::{import, parse_series_csv, DisplayRecord, ImportError};
use rs422core::parameters::ParameterTable;
use rs422core::prelude::SeriesSource;
use rs422core::telemetry::ImportMetrics;
use std::collections::BTreeMap;
use std::sync::Arc;

pub struct ImportOutcome {
    pub records: BTreeMap<String, DisplayRecord>,
    pub accepted_rows: usize,
    pub dropped_rows: usize,
}

#[derive(Clone)]
pub struct Runner {
    config: DashboardConfig,
    table: Arc<ParameterTable>,
    metrics: Arc<ImportMetrics>,
}

impl Runner {
    pub fn new(config: DashboardConfig, table: Arc<ParameterTable>) -> Self {
        Self {
            config,
            table,
            metrics: Arc::new(ImportMetrics::new()),
        }
    }

    pub fn table(&self) -> &ParameterTable {
        &self.table
    }

    pub fn metrics(&self) -> &ImportMetrics {
        &self.metrics
    }

    pub fn link_report(&self) -> LinkReport {
        self.config.link.report(&self.config.thresholds)
    }

    /// Parses and imports a telemetry file; any failure rejects it whole.
    pub fn import_csv(&self, text: &str) -> Result<ImportOutcome, ImportError> {
        let rows = match parse_series_csv(text) {
            Ok(rows) => rows,
            Err(err) => {
                warn!("rejected telemetry file: {}", err);
                self.metrics.record_rejected();
                return Err(err);
            }
        };

        let records = import(&rows, &self.table);
        let accepted_rows = records.values().map(|r| r.values.len()).sum::<usize>();
        let dropped_rows = rows.len() - accepted_rows;
        self.metrics.record_import(accepted_rows, dropped_rows);
        info!(
            "imported {} rows for {} parameters ({} rows with unknown parameters dropped)",
            accepted_rows,
            records.len(),
            dropped_rows
        );

        Ok(ImportOutcome {
            records,
            accepted_rows,
            dropped_rows,
        })
    }

    pub fn simulate<S: SeriesSource>(
        &self,
        source: &mut S,
    ) -> Result<BTreeMap<String, DisplayRecord>, S::Error> {
        let mut records = BTreeMap::new();
        for config in self.table.iter() {
            let series = source.generate_series(config)?;
            records.insert(
                config.name.clone(),
                DisplayRecord::from_series(config.clone(), &series),
            );
        }
        Ok(records)
    }

    pub fn imported_model(&self, outcome: ImportOutcome) -> DashboardModel {
        let model = DashboardModel::new(DataSource::Imported, outcome.records, self.link_report());
        if model.parameters.is_empty() {
            let valid = self.table.names().collect::<Vec<_>>().join(", ");
            model.with_note(format!(
                "No matching parameters found in the uploaded data. Valid parameter names: {valid}"
            ))
        } else {
            let loaded = model.parameters.len();
            model.with_note(format!("Loaded data for {loaded} parameters"))
        }
    }

    /// Fresh simulated series ending at the current local time.
    pub fn simulated_model(&self) -> anyhow::Result<DashboardModel> {
        let mut generator = NormalSeriesGenerator::new(
            self.config.points,
            self.config.seed,
            Local::now().naive_local(),
        );
        let records = self.simulate(&mut generator)?;
        Ok(
            DashboardModel::new(DataSource::Simulated, records, self.link_report())
                .with_note("Simulated data drawn from configured mean and standard deviation"),
        )
    }

    pub fn empty_model(&self) -> DashboardModel {
        DashboardModel::new(DataSource::Empty, BTreeMap::new(), self.link_report())
            .with_note("No parameter data available. Upload a CSV file with valid data.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn runner() -> Runner {
        Runner::new(
            DashboardConfig {
                points: 8,
                seed: Some(3),
                ..Default::default()
            },
            Arc::new(ParameterTable::builtin()),
        )
    }

    #[test]
    fn runner_imports_and_counts_rows() {
        let runner = runner();
        let text = "Timestamp,Parameter,Value\n\
                    2024-01-01 10:05:00,Temperature,20\n\
                    2024-01-01 10:00:00,Temperature,18\n\
                    2024-01-01 10:00:00,Pressure,1012\n";
        let outcome = runner.import_csv(text).unwrap();
        assert_eq!(outcome.accepted_rows, 2);
        assert_eq!(outcome.dropped_rows, 1);
        assert_eq!(outcome.records["Temperature"].values, vec![18.0, 20.0]);

        let counters = runner.metrics().snapshot();
        assert_eq!(counters.imports, 1);
        assert_eq!(counters.dropped_rows, 1);
    }

    #[test]
    fn runner_counts_rejected_files() {
        let runner = runner();
        let err = runner
            .import_csv("Timestamp,Parameter\n2024-01-01 10:00:00,Voltage\n")
            .err()
            .unwrap();
        assert!(matches!(err, ImportError::Schema(_)));
        assert_eq!(runner.metrics().snapshot().rejected, 1);
        assert_eq!(runner.metrics().snapshot().imports, 0);
    }

    #[test]
    fn imported_model_notes_missing_matches() {
        let runner = runner();
        let outcome = runner
            .import_csv("Timestamp,Parameter,Value\n2024-01-01 10:00:00,Pressure,1\n")
            .unwrap();
        let model = runner.imported_model(outcome);
        assert!(model.parameters.is_empty());
        assert!(model.notes[0].contains("Temperature, Voltage, Humidity, Resistance"));
    }

    #[test]
    fn runner_simulates_every_parameter() {
        let runner = runner();
        let end = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 30, 0)
            .unwrap();
        let mut generator = NormalSeriesGenerator::new(8, Some(3), end);
        let records = runner.simulate(&mut generator).unwrap();
        assert_eq!(records.len(), 4);
        assert!(records.values().all(|r| r.values.len() == 8));

        let model = runner.simulated_model().unwrap();
        assert_eq!(model.source, DataSource::Simulated);
        assert_eq!(model.sample_count(), 32);
    }
}
