//! Classification and telemetry-import core for the RS422 debug dashboard.
//!
//! Everything here is synchronous and free of I/O beyond the reader handed
//! to the importer. A single [`ParameterTable`] is built once and shared by
//! the classifier, the importer and any series generator.

pub mod comms;
pub mod ingest;
pub mod math;
pub mod parameters;
pub mod prelude;
pub mod telemetry;

pub use ingest::{import, import_csv, DisplayRecord, ImportError, ImportResult};
pub use parameters::{ParameterConfig, ParameterTable, StatusClass};
pub use prelude::{SeriesRecord, SeriesRow, SeriesSource};
