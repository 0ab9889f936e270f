use anyhow::Context;
use rs422core::comms::{LinkMetrics, LinkThresholds};
use rs422core::parameters::{ParameterConfig, ParameterTable};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Address the HTTP bridge listens on.
    pub bind: SocketAddr,
    /// Samples generated per parameter in simulated mode.
    pub points: usize,
    pub seed: Option<u64>,
    /// Optional YAML parameter table replacing the built-in one.
    pub parameters: Option<PathBuf>,
    pub link: LinkMetrics,
    pub thresholds: LinkThresholds,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 9000)),
            points: 30,
            seed: None,
            parameters: None,
            link: LinkMetrics::default(),
            thresholds: LinkThresholds::default(),
        }
    }
}

impl DashboardConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading dashboard config {}", path_ref.display()))?;
        let mut config: DashboardConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing dashboard config {}", path_ref.display()))?;
        // Table paths are relative to the config file, not the working directory.
        if let (Some(table), Some(dir)) = (config.parameters.as_mut(), path_ref.parent()) {
            if table.is_relative() {
                *table = dir.join(&*table);
            }
        }
        Ok(config)
    }

    /// The built-in table unless `parameters` names a YAML table to load.
    pub fn parameter_table(&self) -> anyhow::Result<ParameterTable> {
        match &self.parameters {
            Some(path) => load_parameter_table(path),
            None => Ok(ParameterTable::builtin()),
        }
    }
}

pub fn load_parameter_table<P: AsRef<Path>>(path: P) -> anyhow::Result<ParameterTable> {
    let path_ref = path.as_ref();
    let contents = fs::read_to_string(path_ref)
        .with_context(|| format!("reading parameter table {}", path_ref.display()))?;
    let parameters: Vec<ParameterConfig> = serde_yaml::from_str(&contents)
        .with_context(|| format!("parsing parameter table {}", path_ref.display()))?;
    ParameterTable::new(parameters)
        .with_context(|| format!("validating parameter table {}", path_ref.display()))
}
