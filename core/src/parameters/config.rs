use crate::parameters::status::StatusClass;
use crate::prelude::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Band thresholds and display properties of one monitored parameter.
///
/// `mean` and `std_dev` are only consulted by simulated series generators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterConfig {
    pub name: String,
    pub unit: String,
    pub icon: String,
    pub normal_min: f64,
    pub normal_max: f64,
    pub warning_min: f64,
    pub warning_max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl ParameterConfig {
    /// Classifies `value` against this parameter's bands.
    ///
    /// Both bands are inclusive and the normal band is checked first, so a
    /// value sitting exactly on a shared boundary takes the better class.
    pub fn classify(&self, value: f64) -> StatusClass {
        if self.normal_min <= value && value <= self.normal_max {
            StatusClass::Normal
        } else if self.warning_min <= value && value <= self.warning_max {
            StatusClass::Warning
        } else {
            StatusClass::Critical
        }
    }

    fn validate(&self) -> ConfigResult<()> {
        let bounds = [
            ("normal_min", self.normal_min),
            ("normal_max", self.normal_max),
            ("warning_min", self.warning_min),
            ("warning_max", self.warning_max),
            ("mean", self.mean),
            ("std_dev", self.std_dev),
        ];
        for (field, value) in bounds {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite {
                    name: self.name.clone(),
                    field,
                });
            }
        }

        let ordered = self.warning_min <= self.normal_min
            && self.normal_min <= self.normal_max
            && self.normal_max <= self.warning_max;
        if !ordered {
            return Err(ConfigError::BandOrder(self.name.clone()));
        }

        if self.std_dev < 0.0 {
            return Err(ConfigError::NegativeStdDev(self.name.clone()));
        }
        Ok(())
    }
}

/// The single source of truth for parameter thresholds.
///
/// Built once at startup and shared (usually behind an `Arc`) by the
/// classifier, the importer and any series generator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ParameterTable {
    parameters: Vec<ParameterConfig>,
}

impl ParameterTable {
    /// Builds a table from externally supplied configs, enforcing
    /// `warning_min <= normal_min <= normal_max <= warning_max` for each entry.
    pub fn new(parameters: Vec<ParameterConfig>) -> ConfigResult<Self> {
        if parameters.is_empty() {
            return Err(ConfigError::Empty);
        }

        let mut seen = HashSet::new();
        for parameter in &parameters {
            if parameter.name.trim().is_empty() {
                return Err(ConfigError::BlankName);
            }
            if !seen.insert(parameter.name.as_str()) {
                return Err(ConfigError::DuplicateName(parameter.name.clone()));
            }
            parameter.validate()?;
        }

        Ok(Self { parameters })
    }

    /// Thresholds for the four parameters monitored on the RS422 test rig.
    pub fn builtin() -> Self {
        let entry = |name: &str, unit: &str, icon: &str, bands: [f64; 4], sim: [f64; 2]| {
            ParameterConfig {
                name: name.into(),
                unit: unit.into(),
                icon: icon.into(),
                normal_min: bands[0],
                normal_max: bands[1],
                warning_min: bands[2],
                warning_max: bands[3],
                mean: sim[0],
                std_dev: sim[1],
            }
        };

        Self {
            parameters: vec![
                entry("Temperature", "°C", "🌡️", [15.0, 35.0, 10.0, 40.0], [25.0, 5.0]),
                entry("Voltage", "V", "⚡", [4.8, 5.2, 4.5, 5.5], [5.0, 0.3]),
                entry("Humidity", "%", "💧", [30.0, 60.0, 20.0, 70.0], [45.0, 10.0]),
                entry("Resistance", "Ω", "Ω", [95.0, 105.0, 90.0, 110.0], [100.0, 5.0]),
            ],
        }
    }

    pub fn get(&self, name: &str) -> Option<&ParameterConfig> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParameterConfig> {
        self.parameters.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.parameters.iter().map(|p| p.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Classifies `value` for the named parameter; unknown names are `Inactive`.
    pub fn classify(&self, value: f64, parameter_name: &str) -> StatusClass {
        match self.get(parameter_name) {
            Some(config) => config.classify(value),
            None => StatusClass::Inactive,
        }
    }
}

impl Default for ParameterTable {
    fn default() -> Self {
        Self::builtin()
    }
}
