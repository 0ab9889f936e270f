use rs422core::comms::{LedPanel, LinkReport};
use rs422core::ingest::DisplayRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    #[default]
    Empty,
    Simulated,
    Imported,
}

/// Everything the front-end needs for one render pass.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DashboardModel {
    pub source: DataSource,
    pub parameters: BTreeMap<String, DisplayRecord>,
    pub link: LinkReport,
    pub leds: LedPanel,
    pub notes: Vec<String>,
}

impl DashboardModel {
    pub fn new(
        source: DataSource,
        parameters: BTreeMap<String, DisplayRecord>,
        link: LinkReport,
    ) -> Self {
        let mut leds = LedPanel::default();
        for (name, record) in &parameters {
            leds.apply_parameter_status(name, record.current_status());
        }

        Self {
            source,
            parameters,
            link,
            leds,
            notes: Vec::new(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn sample_count(&self) -> usize {
        self.parameters.values().map(|record| record.values.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rs422core::comms::LedColor;
    use rs422core::ingest::import;
    use rs422core::parameters::ParameterTable;
    use rs422core::prelude::SeriesRow;

    #[test]
    fn model_drives_leds_from_latest_values() {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let rows = vec![
            SeriesRow::new(ts, "Voltage", 5.0),
            SeriesRow::new(ts, "Temperature", 41.0),
        ];
        let records = import(&rows, &ParameterTable::builtin());
        let model = DashboardModel::new(DataSource::Imported, records, LinkReport::default());

        assert_eq!(model.leds.get("VOLTAGE").unwrap().color, LedColor::Green);
        assert_eq!(model.leds.get("TEMP").unwrap().color, LedColor::Red);
        assert_eq!(model.sample_count(), 2);
    }

    #[test]
    fn default_model_is_empty() {
        let model = DashboardModel::default();
        assert_eq!(model.source, DataSource::Empty);
        assert!(model.parameters.is_empty());
        assert_eq!(model.leds, LedPanel::default());
    }
}
