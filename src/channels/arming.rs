//! # Arming Module
//!
//! Arming and flight mode are not separate state: they are whatever value
//! aux1 currently holds. The flight controller must be configured with
//! matching aux ranges for these to have any effect.

/// aux1 value when disarmed (also the power-on default)
pub const AUX1_DISARMED: u16 = 1500;

/// aux1 value that arms the flight controller
pub const AUX1_ARMED: u16 = 1650;

/// aux1 value selecting the alternate flight mode
pub const AUX1_FLIGHT_MODE: u16 = 1750;

/// Arming state as read back from aux1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArmingState {
    Disarmed,
    Armed,
    FlightMode,
}

impl ArmingState {
    /// The aux1 value that selects this state
    pub fn aux1_value(self) -> u16 {
        match self {
            ArmingState::Disarmed => AUX1_DISARMED,
            ArmingState::Armed => AUX1_ARMED,
            ArmingState::FlightMode => AUX1_FLIGHT_MODE,
        }
    }

    /// Interpret an aux1 value, `None` if it matches no known state
    pub fn from_aux1(aux1: u16) -> Option<Self> {
        match aux1 {
            AUX1_DISARMED => Some(ArmingState::Disarmed),
            AUX1_ARMED => Some(ArmingState::Armed),
            AUX1_FLIGHT_MODE => Some(ArmingState::FlightMode),
            _ => None,
        }
    }
}

impl std::fmt::Display for ArmingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ArmingState::Disarmed => "disarmed",
            ArmingState::Armed => "armed",
            ArmingState::FlightMode => "flight mode",
        };
        f.write_str(name)
    }
}
