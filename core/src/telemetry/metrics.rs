use serde::Serialize;
use std::sync::Mutex;

/// Counters shared by every import entry point of a running dashboard.
pub struct ImportMetrics {
    inner: Mutex<ImportCounters>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportCounters {
    pub imports: usize,
    pub rejected: usize,
    pub accepted_rows: usize,
    pub dropped_rows: usize,
}

impl ImportMetrics {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(ImportCounters::default()),
        }
    }

    pub fn record_import(&self, accepted_rows: usize, dropped_rows: usize) {
        if let Ok(mut counters) = self.inner.lock() {
            counters.imports += 1;
            counters.accepted_rows += accepted_rows;
            counters.dropped_rows += dropped_rows;
        }
    }

    pub fn record_rejected(&self) {
        if let Ok(mut counters) = self.inner.lock() {
            counters.rejected += 1;
        }
    }

    pub fn snapshot(&self) -> ImportCounters {
        if let Ok(counters) = self.inner.lock() {
            *counters
        } else {
            ImportCounters::default()
        }
    }
}

impl Default for ImportMetrics {
    fn default() -> Self {
        Self::new()
    }
}
