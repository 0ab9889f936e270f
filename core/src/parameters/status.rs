use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity class of a single measurement against its configured bands.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum StatusClass {
    Normal,
    Warning,
    Critical,
    /// The parameter is not part of the configured table.
    Inactive,
}

impl StatusClass {
    /// Hex colour used by the dashboard for this class.
    pub fn color(self) -> &'static str {
        match self {
            StatusClass::Normal => "#28a745",
            StatusClass::Warning => "#ffc107",
            StatusClass::Critical => "#dc3545",
            StatusClass::Inactive => "#6c757d",
        }
    }

    /// RGB triple in `0.0..=1.0`, for renderers that do not take hex strings.
    pub fn rgb(self) -> [f32; 3] {
        match self {
            StatusClass::Normal => [0.157, 0.655, 0.271],
            StatusClass::Warning => [1.0, 0.757, 0.027],
            StatusClass::Critical => [0.863, 0.208, 0.271],
            StatusClass::Inactive => [0.424, 0.459, 0.490],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusClass::Normal => "NORMAL",
            StatusClass::Warning => "WARNING",
            StatusClass::Critical => "CRITICAL",
            StatusClass::Inactive => "INACTIVE",
        }
    }
}

impl fmt::Display for StatusClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
