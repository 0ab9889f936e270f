pub mod metrics;

pub use metrics::{ImportCounters, ImportMetrics};
