pub mod stats;

pub use stats::SeriesStats;
