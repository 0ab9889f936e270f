pub mod leds;
pub mod link;
pub mod switches;

pub use leds::{LedColor, LedIndicator, LedPanel};
pub use link::{LinkMetrics, LinkReport, LinkThresholds, RateGrade};
pub use switches::{CommunicationStatus, ControlSwitches, Switch};
