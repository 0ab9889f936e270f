use crate::comms::switches::{CommunicationStatus, ControlSwitches};
use crate::parameters::StatusClass;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedColor {
    Green,
    Yellow,
    Red,
}

impl LedColor {
    pub fn hex(self) -> &'static str {
        match self {
            LedColor::Green => "#28a745",
            LedColor::Yellow => "#ffc107",
            LedColor::Red => "#dc3545",
        }
    }
}

impl From<StatusClass> for LedColor {
    fn from(status: StatusClass) -> Self {
        match status {
            StatusClass::Normal => LedColor::Green,
            StatusClass::Warning | StatusClass::Inactive => LedColor::Yellow,
            StatusClass::Critical => LedColor::Red,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedIndicator {
    pub id: u8,
    pub name: String,
    pub color: LedColor,
    pub description: String,
}

impl LedIndicator {
    fn new(id: u8, name: &str, color: LedColor, description: &str) -> Self {
        Self {
            id,
            name: name.into(),
            color,
            description: description.into(),
        }
    }
}

/// The eight front-panel status LEDs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedPanel {
    pub leds: Vec<LedIndicator>,
}

impl Default for LedPanel {
    fn default() -> Self {
        use LedColor::*;
        Self {
            leds: vec![
                LedIndicator::new(1, "POWER", Green, "System Power OK"),
                LedIndicator::new(2, "TEMP", Green, "Temperature Normal"),
                LedIndicator::new(3, "VOLTAGE", Yellow, "Voltage Warning"),
                LedIndicator::new(4, "RS422", Green, "Communication Active"),
                LedIndicator::new(5, "MEMORY", Red, "Memory Error"),
                LedIndicator::new(6, "CPU", Green, "CPU Normal"),
                LedIndicator::new(7, "I/O", Green, "I/O Ports OK"),
                LedIndicator::new(8, "NET", Yellow, "Network Slow"),
            ],
        }
    }
}

impl LedPanel {
    pub fn get(&self, name: &str) -> Option<&LedIndicator> {
        self.leds.iter().find(|led| led.name == name)
    }

    fn set(&mut self, name: &str, color: LedColor, description: String) {
        if let Some(led) = self.leds.iter_mut().find(|led| led.name == name) {
            led.color = color;
            led.description = description;
        }
    }

    /// Drives the TEMP or VOLTAGE LED from the latest status of its parameter.
    /// Other parameters have no LED and are ignored.
    pub fn apply_parameter_status(&mut self, parameter: &str, status: StatusClass) {
        let led = match parameter {
            "Temperature" => "TEMP",
            "Voltage" => "VOLTAGE",
            _ => return,
        };
        let description = match status {
            StatusClass::Normal => format!("{parameter} Normal"),
            StatusClass::Warning => format!("{parameter} Warning"),
            StatusClass::Critical => format!("{parameter} Critical"),
            StatusClass::Inactive => format!("{parameter} Unknown"),
        };
        self.set(led, status.into(), description);
    }

    /// Drives the POWER and RS422 LEDs from the panel toggles.
    pub fn apply_switches(&mut self, switches: &ControlSwitches) {
        if switches.main_power {
            self.set("POWER", LedColor::Green, "System Power OK".into());
        } else {
            self.set("POWER", LedColor::Red, "System Powered Off".into());
        }

        let status = switches.communication_status();
        let description = format!("Communication {}", status.label());
        let color = match status {
            CommunicationStatus::Active => LedColor::from(switches.banner_status()),
            CommunicationStatus::Standby => LedColor::Yellow,
            CommunicationStatus::Offline => LedColor::Red,
        };
        self.set("RS422", color, description);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_panel_has_eight_leds() {
        let panel = LedPanel::default();
        assert_eq!(panel.leds.len(), 8);
        assert_eq!(panel.get("MEMORY").unwrap().color, LedColor::Red);
    }

    #[test]
    fn parameter_status_drives_matching_led() {
        let mut panel = LedPanel::default();
        panel.apply_parameter_status("Voltage", StatusClass::Normal);
        panel.apply_parameter_status("Temperature", StatusClass::Critical);
        panel.apply_parameter_status("Humidity", StatusClass::Critical);

        assert_eq!(panel.get("VOLTAGE").unwrap().color, LedColor::Green);
        assert_eq!(panel.get("TEMP").unwrap().color, LedColor::Red);
        assert_eq!(panel.get("TEMP").unwrap().description, "Temperature Critical");
        assert_eq!(panel, {
            let mut expected = LedPanel::default();
            expected.apply_parameter_status("Voltage", StatusClass::Normal);
            expected.apply_parameter_status("Temperature", StatusClass::Critical);
            expected
        });
    }

    #[test]
    fn switches_drive_power_and_link_leds() {
        let mut panel = LedPanel::default();
        panel.apply_switches(&ControlSwitches {
            main_power: false,
            eom: true,
            som: true,
        });
        assert_eq!(panel.get("POWER").unwrap().color, LedColor::Red);
        assert_eq!(panel.get("RS422").unwrap().color, LedColor::Red);
        assert_eq!(panel.get("RS422").unwrap().description, "Communication Offline");

        panel.apply_switches(&ControlSwitches::default());
        assert_eq!(panel.get("POWER").unwrap().color, LedColor::Green);
        assert_eq!(panel.get("RS422").unwrap().color, LedColor::Yellow);
    }
}
