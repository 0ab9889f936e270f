use crate::parameters::StatusClass;
use serde::{Deserialize, Serialize};

/// Data-rate grade boundaries for the RS422 link, in Mbit/s.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkThresholds {
    pub excellent: f64,
    pub good: f64,
    pub fair: f64,
    pub max_rate: f64,
    /// Minimum message success percentage counted as healthy.
    pub success_excellent: f64,
    pub success_good: f64,
}

impl Default for LinkThresholds {
    fn default() -> Self {
        Self {
            excellent: 8.0,
            good: 5.0,
            fair: 3.0,
            max_rate: 10.0,
            success_excellent: 95.0,
            success_good: 80.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateGrade {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl RateGrade {
    pub fn label(self) -> &'static str {
        match self {
            RateGrade::Excellent => "EXCELLENT",
            RateGrade::Good => "GOOD",
            RateGrade::Fair => "FAIR",
            RateGrade::Poor => "POOR",
        }
    }
}

/// Simulated link counters; nothing here talks to real hardware.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkMetrics {
    pub current_rate: f64,
    pub valid_messages: u64,
    pub total_messages: u64,
}

impl Default for LinkMetrics {
    fn default() -> Self {
        Self {
            current_rate: 8.5,
            valid_messages: 975,
            total_messages: 1000,
        }
    }
}

impl LinkMetrics {
    /// Message success percentage; zero when nothing was exchanged.
    pub fn success_rate(&self) -> f64 {
        if self.total_messages == 0 {
            return 0.0;
        }
        self.valid_messages as f64 * 100.0 / self.total_messages as f64
    }

    pub fn rate_percentage(&self, thresholds: &LinkThresholds) -> f64 {
        if thresholds.max_rate <= 0.0 {
            return 0.0;
        }
        (self.current_rate * 100.0 / thresholds.max_rate).clamp(0.0, 100.0)
    }

    pub fn grade(&self, thresholds: &LinkThresholds) -> RateGrade {
        if self.current_rate >= thresholds.excellent {
            RateGrade::Excellent
        } else if self.current_rate >= thresholds.good {
            RateGrade::Good
        } else if self.current_rate >= thresholds.fair {
            RateGrade::Fair
        } else {
            RateGrade::Poor
        }
    }

    pub fn rate_status(&self, thresholds: &LinkThresholds) -> StatusClass {
        if self.current_rate >= thresholds.excellent {
            StatusClass::Normal
        } else if self.current_rate >= thresholds.good {
            StatusClass::Warning
        } else {
            StatusClass::Critical
        }
    }

    pub fn success_status(&self, thresholds: &LinkThresholds) -> StatusClass {
        let rate = self.success_rate();
        if rate >= thresholds.success_excellent {
            StatusClass::Normal
        } else if rate >= thresholds.success_good {
            StatusClass::Warning
        } else {
            StatusClass::Critical
        }
    }

    pub fn report(&self, thresholds: &LinkThresholds) -> LinkReport {
        LinkReport {
            metrics: *self,
            max_rate: thresholds.max_rate,
            rate_percentage: self.rate_percentage(thresholds),
            grade: self.grade(thresholds),
            rate_status: self.rate_status(thresholds),
            success_rate: self.success_rate(),
            success_status: self.success_status(thresholds),
        }
    }
}

/// Link metrics together with their derived grades, as handed to a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinkReport {
    pub metrics: LinkMetrics,
    pub max_rate: f64,
    pub rate_percentage: f64,
    pub grade: RateGrade,
    pub rate_status: StatusClass,
    pub success_rate: f64,
    pub success_status: StatusClass,
}

impl Default for LinkReport {
    fn default() -> Self {
        LinkMetrics::default().report(&LinkThresholds::default())
    }
}
