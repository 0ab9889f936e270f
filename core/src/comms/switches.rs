use crate::parameters::StatusClass;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Switch {
    MainPower,
    /// End-of-message detection.
    Eom,
    /// Start-of-message detection.
    Som,
}

impl Switch {
    pub const ALL: [Switch; 3] = [Switch::MainPower, Switch::Eom, Switch::Som];

    pub fn label(self) -> &'static str {
        match self {
            Switch::MainPower => "Main Power",
            Switch::Eom => "EOM",
            Switch::Som => "SOM",
        }
    }
}

/// State of the three panel toggles, owned by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlSwitches {
    pub main_power: bool,
    pub eom: bool,
    pub som: bool,
}

impl Default for ControlSwitches {
    fn default() -> Self {
        Self {
            main_power: true,
            eom: false,
            som: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommunicationStatus {
    Active,
    Standby,
    Offline,
}

impl CommunicationStatus {
    pub fn label(self) -> &'static str {
        match self {
            CommunicationStatus::Active => "Active",
            CommunicationStatus::Standby => "Standby",
            CommunicationStatus::Offline => "Offline",
        }
    }
}

impl ControlSwitches {
    pub fn is_on(&self, switch: Switch) -> bool {
        match switch {
            Switch::MainPower => self.main_power,
            Switch::Eom => self.eom,
            Switch::Som => self.som,
        }
    }

    pub fn toggle(&mut self, switch: Switch) {
        let slot = match switch {
            Switch::MainPower => &mut self.main_power,
            Switch::Eom => &mut self.eom,
            Switch::Som => &mut self.som,
        };
        *slot = !*slot;
    }

    /// Powered with either detector enabled is `Active`, powered with
    /// neither is `Standby`, unpowered is `Offline`.
    pub fn communication_status(&self) -> CommunicationStatus {
        if !self.main_power {
            CommunicationStatus::Offline
        } else if self.som || self.eom {
            CommunicationStatus::Active
        } else {
            CommunicationStatus::Standby
        }
    }

    /// Banner severity: only a powered link with both detectors is fully healthy.
    pub fn banner_status(&self) -> StatusClass {
        match self.communication_status() {
            CommunicationStatus::Offline => StatusClass::Critical,
            CommunicationStatus::Active if self.som && self.eom => StatusClass::Normal,
            _ => StatusClass::Warning,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn switches(main_power: bool, eom: bool, som: bool) -> ControlSwitches {
        ControlSwitches {
            main_power,
            eom,
            som,
        }
    }

    #[test]
    fn power_off_is_offline_regardless_of_detectors() {
        for (eom, som) in [(false, false), (true, false), (false, true), (true, true)] {
            let state = switches(false, eom, som);
            assert_eq!(state.communication_status(), CommunicationStatus::Offline);
            assert_eq!(state.banner_status(), StatusClass::Critical);
        }
    }

    #[test]
    fn either_detector_makes_link_active() {
        assert_eq!(
            switches(true, true, false).communication_status(),
            CommunicationStatus::Active
        );
        assert_eq!(
            switches(true, false, true).communication_status(),
            CommunicationStatus::Active
        );
        assert_eq!(
            switches(true, false, false).communication_status(),
            CommunicationStatus::Standby
        );
    }

    #[test]
    fn banner_is_normal_only_with_both_detectors() {
        assert_eq!(switches(true, true, true).banner_status(), StatusClass::Normal);
        assert_eq!(switches(true, false, true).banner_status(), StatusClass::Warning);
        assert_eq!(switches(true, false, false).banner_status(), StatusClass::Warning);
    }

    #[test]
    fn toggle_flips_only_the_named_switch() {
        let mut state = ControlSwitches::default();
        state.toggle(Switch::Eom);
        assert_eq!(state, switches(true, true, true));
        state.toggle(Switch::MainPower);
        assert!(!state.is_on(Switch::MainPower));
        assert!(state.is_on(Switch::Som));
    }
}
