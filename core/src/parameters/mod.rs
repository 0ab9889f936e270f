pub mod config;
pub mod status;

pub use config::{ParameterConfig, ParameterTable};
pub use status::StatusClass;
