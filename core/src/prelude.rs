use crate::parameters::ParameterConfig;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Timestamp layout accepted in imported telemetry files.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Layout of the axis labels attached to every display record.
pub const TIME_LABEL_FORMAT: &str = "%H:%M";

/// One measurement as it appears in an imported table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesRow {
    pub timestamp: NaiveDateTime,
    pub parameter: String,
    pub value: f64,
}

impl SeriesRow {
    pub fn new(timestamp: NaiveDateTime, parameter: impl Into<String>, value: f64) -> Self {
        Self {
            timestamp,
            parameter: parameter.into(),
            value,
        }
    }
}

/// Time-ordered samples of a single parameter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesRecord {
    pub timestamps: Vec<NaiveDateTime>,
    pub values: Vec<f64>,
}

impl SeriesRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            timestamps: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, timestamp: NaiveDateTime, value: f64) {
        self.timestamps.push(timestamp);
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn time_labels(&self) -> Vec<String> {
        self.timestamps
            .iter()
            .map(|ts| ts.format(TIME_LABEL_FORMAT).to_string())
            .collect()
    }
}

/// Producer of synthetic series, kept outside the classification core.
pub trait SeriesSource {
    type Error;

    fn generate_series(&mut self, config: &ParameterConfig) -> Result<SeriesRecord, Self::Error>;
}

/// Rejections raised while building a parameter table.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("parameter table is empty")]
    Empty,
    #[error("parameter name must not be blank")]
    BlankName,
    #[error("parameter {0} is defined more than once")]
    DuplicateName(String),
    #[error("parameter {name}: {field} must be finite")]
    NonFinite { name: String, field: &'static str },
    #[error("parameter {0}: bands must satisfy warning_min <= normal_min <= normal_max <= warning_max")]
    BandOrder(String),
    #[error("parameter {0}: std_dev must not be negative")]
    NegativeStdDev(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
