//! # Key Commands
//!
//! Key bindings:
//!
//! | Key | Command |
//! |-----|---------|
//! | `v`, `c` | Arm |
//! | `b` | Disarm |
//! | `n` | Alternate flight mode |
//! | `w` / `s` | Pitch up / down |
//! | `a` / `d` | Roll left / right |
//! | `j` / `l` | Yaw left / right |
//! | `i` / `k` | Throttle up / down |
//! | `x`, `z` | Disarm and exit |

use tracing::{debug, info};

use crate::channels::{Channel, ChannelStore};

use super::KeySteps;

/// An action requested from the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Arm,
    Disarm,
    FlightMode,
    PitchUp,
    PitchDown,
    RollLeft,
    RollRight,
    YawLeft,
    YawRight,
    ThrottleUp,
    ThrottleDown,
    Exit,
}

impl Command {
    /// Look up the command bound to `key`
    ///
    /// Bindings are lowercase only; `W` or `X` with Shift or Caps Lock is unbound.
    pub fn from_key(key: char) -> Option<Self> {
        let command = match key {
            'v' | 'c' => Command::Arm,
            'b' => Command::Disarm,
            'n' => Command::FlightMode,
            'w' => Command::PitchUp,
            's' => Command::PitchDown,
            'a' => Command::RollLeft,
            'd' => Command::RollRight,
            'j' => Command::YawLeft,
            'l' => Command::YawRight,
            'i' => Command::ThrottleUp,
            'k' => Command::ThrottleDown,
            'x' | 'z' => Command::Exit,
            _ => return None,
        };
        Some(command)
    }

    /// The channel and signed step size a nudge command moves
    fn nudge(self, steps: &KeySteps) -> Option<(Channel, i32)> {
        match self {
            Command::PitchUp => Some((Channel::Pitch, steps.pitch as i32)),
            Command::PitchDown => Some((Channel::Pitch, -(steps.pitch as i32))),
            Command::RollLeft => Some((Channel::Roll, -(steps.roll as i32))),
            Command::RollRight => Some((Channel::Roll, steps.roll as i32)),
            Command::YawLeft => Some((Channel::Yaw, -(steps.yaw as i32))),
            Command::YawRight => Some((Channel::Yaw, steps.yaw as i32)),
            Command::ThrottleUp => Some((Channel::Throttle, steps.throttle as i32)),
            Command::ThrottleDown => Some((Channel::Throttle, -(steps.throttle as i32))),
            _ => None,
        }
    }
}

/// Apply `command` to `store`
///
/// Returns `false` when the command asks to exit. Exit disarms first.
/// No arming rules are enforced here; the flight controller decides.
pub fn apply_command(store: &ChannelStore, command: Command, steps: &KeySteps) -> bool {
    match command {
        Command::Arm => store.arm(),
        Command::Disarm => store.disarm(),
        Command::FlightMode => store.set_flight_mode(),
        Command::Exit => {
            info!("Exit requested, disarming");
            store.disarm();
            return false;
        }
        nudge => {
            if let Some((channel, delta)) = nudge.nudge(steps) {
                let value = store.adjust(channel, delta);
                debug!("{:?} -> {:?} = {}", nudge, channel, value);
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::{ArmingState, ChannelSet, ChannelUpdate};

    #[test]
    fn test_key_bindings() {
        assert_eq!(Command::from_key('v'), Some(Command::Arm));
        assert_eq!(Command::from_key('c'), Some(Command::Arm));
        assert_eq!(Command::from_key('b'), Some(Command::Disarm));
        assert_eq!(Command::from_key('n'), Some(Command::FlightMode));
        assert_eq!(Command::from_key('w'), Some(Command::PitchUp));
        assert_eq!(Command::from_key('s'), Some(Command::PitchDown));
        assert_eq!(Command::from_key('a'), Some(Command::RollLeft));
        assert_eq!(Command::from_key('d'), Some(Command::RollRight));
        assert_eq!(Command::from_key('j'), Some(Command::YawLeft));
        assert_eq!(Command::from_key('l'), Some(Command::YawRight));
        assert_eq!(Command::from_key('i'), Some(Command::ThrottleUp));
        assert_eq!(Command::from_key('k'), Some(Command::ThrottleDown));
        assert_eq!(Command::from_key('x'), Some(Command::Exit));
        assert_eq!(Command::from_key('z'), Some(Command::Exit));
    }

    #[test]
    fn test_uppercase_keys_are_unbound() {
        for key in ['W', 'X', 'V', 'C', 'Z'] {
            assert_eq!(Command::from_key(key), None, "{:?} should be unbound", key);
        }
    }

    #[test]
    fn test_unbound_keys() {
        for key in ['q', 'e', '1', ' ', '\n', '\u{1b}'] {
            assert_eq!(Command::from_key(key), None, "{:?} should be unbound", key);
        }
    }

    #[test]
    fn test_arm_commands() {
        let store = ChannelStore::new();
        let steps = KeySteps::default();

        assert!(apply_command(&store, Command::Arm, &steps));
        assert_eq!(store.arming_state(), Some(ArmingState::Armed));

        assert!(apply_command(&store, Command::FlightMode, &steps));
        assert_eq!(store.arming_state(), Some(ArmingState::FlightMode));

        assert!(apply_command(&store, Command::Disarm, &steps));
        assert_eq!(store.arming_state(), Some(ArmingState::Disarmed));
    }

    #[test]
    fn test_exit_disarms_and_stops() {
        let store = ChannelStore::new();
        store.arm();

        assert!(!apply_command(&store, Command::Exit, &KeySteps::default()));
        assert_eq!(store.arming_state(), Some(ArmingState::Disarmed));
    }

    #[test]
    fn test_nudges_move_one_channel() {
        let steps = KeySteps::default();
        let cases = [
            (Command::PitchUp, Channel::Pitch, 1510),
            (Command::PitchDown, Channel::Pitch, 1490),
            (Command::RollLeft, Channel::Roll, 1490),
            (Command::RollRight, Channel::Roll, 1510),
            (Command::YawLeft, Channel::Yaw, 1490),
            (Command::YawRight, Channel::Yaw, 1510),
            (Command::ThrottleUp, Channel::Throttle, 1060),
            (Command::ThrottleDown, Channel::Throttle, 1020),
        ];

        for (command, channel, expected) in cases {
            let store = ChannelStore::new();
            assert!(apply_command(&store, command, &steps));

            let mut want = ChannelSet::default();
            want.set(channel, expected);
            assert_eq!(store.snapshot(), want, "{:?}", command);
        }
    }

    #[test]
    fn test_custom_steps() {
        let store = ChannelStore::new();
        let steps = KeySteps {
            pitch: 50,
            roll: 1,
            yaw: 1,
            throttle: 100,
        };

        apply_command(&store, Command::PitchUp, &steps);
        apply_command(&store, Command::ThrottleUp, &steps);

        let values = store.snapshot();
        assert_eq!(values.pitch, 1550);
        assert_eq!(values.throttle, 1140);
    }

    #[test]
    fn test_nudges_do_not_clamp_to_nominal_range() {
        let store = ChannelStore::new();
        store.update(ChannelUpdate::new().throttle(1000));

        apply_command(&store, Command::ThrottleDown, &KeySteps::default());
        assert_eq!(store.snapshot().throttle, 980);
    }
}
