//! # evdev Keyboard Source
//!
//! Reads key presses straight from a Linux input device, so single
//! keystrokes register without pressing Enter and without a terminal.
//! Requires read access to the `/dev/input/eventX` node.

use std::collections::VecDeque;

use evdev::{Device, InputEvent, InputEventKind, Key};
use tracing::info;

use crate::error::{Result, SumdBridgeError};

use super::KeySource;

/// evdev value for a key being released
const KEY_RELEASED: i32 = 0;

/// evdev value for a key going down
const KEY_PRESSED: i32 = 1;

/// evdev value for a held key auto-repeating
const KEY_REPEAT: i32 = 2;

/// While any of these is held, letter presses are chords, not commands
const MODIFIER_KEYS: [Key; 6] = [
    Key::KEY_LEFTCTRL,
    Key::KEY_RIGHTCTRL,
    Key::KEY_LEFTALT,
    Key::KEY_RIGHTALT,
    Key::KEY_LEFTMETA,
    Key::KEY_RIGHTMETA,
];

/// Letter keys understood by the bridge
const LETTER_KEYS: [(Key, char); 26] = [
    (Key::KEY_A, 'a'),
    (Key::KEY_B, 'b'),
    (Key::KEY_C, 'c'),
    (Key::KEY_D, 'd'),
    (Key::KEY_E, 'e'),
    (Key::KEY_F, 'f'),
    (Key::KEY_G, 'g'),
    (Key::KEY_H, 'h'),
    (Key::KEY_I, 'i'),
    (Key::KEY_J, 'j'),
    (Key::KEY_K, 'k'),
    (Key::KEY_L, 'l'),
    (Key::KEY_M, 'm'),
    (Key::KEY_N, 'n'),
    (Key::KEY_O, 'o'),
    (Key::KEY_P, 'p'),
    (Key::KEY_Q, 'q'),
    (Key::KEY_R, 'r'),
    (Key::KEY_S, 's'),
    (Key::KEY_T, 't'),
    (Key::KEY_U, 'u'),
    (Key::KEY_V, 'v'),
    (Key::KEY_W, 'w'),
    (Key::KEY_X, 'x'),
    (Key::KEY_Y, 'y'),
    (Key::KEY_Z, 'z'),
];

/// Keyboard opened through evdev
pub struct EvdevKeyboard {
    device: Device,
    device_path: String,
    decoder: KeyDecoder,
    pending: VecDeque<char>,
}

impl EvdevKeyboard {
    /// Open a keyboard input device
    ///
    /// # Errors
    ///
    /// Returns `Input` if the device cannot be opened (missing or no permission)
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use sumd_bridge::input::keyboard::EvdevKeyboard;
    ///
    /// let keyboard = EvdevKeyboard::open("/dev/input/event0")?;
    /// println!("Reading keys from: {}", keyboard.device_path());
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn open(path: &str) -> Result<Self> {
        let device = Device::open(path)
            .map_err(|e| SumdBridgeError::Input(format!("Failed to open {}: {}", path, e)))?;

        info!(
            "Reading keys from {} ({})",
            path,
            device.name().unwrap_or("unnamed device")
        );

        Ok(Self {
            device,
            device_path: path.to_string(),
            decoder: KeyDecoder::default(),
            pending: VecDeque::new(),
        })
    }

    /// Get the device path of this keyboard
    pub fn device_path(&self) -> &str {
        &self.device_path
    }
}

impl KeySource for EvdevKeyboard {
    fn next_key(&mut self) -> Result<Option<char>> {
        loop {
            if let Some(key) = self.pending.pop_front() {
                return Ok(Some(key));
            }

            let events = self
                .device
                .fetch_events()
                .map_err(|e| SumdBridgeError::Input(format!("Failed to fetch events: {}", e)))?;
            let decoder = &mut self.decoder;
            self.pending.extend(events.filter_map(|event| decoder.decode(&event)));
        }
    }
}

/// Turns raw key events into letters, tracking held modifiers
///
/// Ctrl+C in particular arrives as a plain `KEY_C` press between the Ctrl
/// down and up events; it must not read as `c`.
#[derive(Debug, Default)]
pub struct KeyDecoder {
    held_modifiers: Vec<Key>,
}

impl KeyDecoder {
    /// Letter for a press or auto-repeat with no modifier held
    pub fn decode(&mut self, event: &InputEvent) -> Option<char> {
        let InputEventKind::Key(key) = event.kind() else {
            return None;
        };

        if MODIFIER_KEYS.contains(&key) {
            if event.value() == KEY_RELEASED {
                self.held_modifiers.retain(|held| *held != key);
            } else if !self.held_modifiers.contains(&key) {
                self.held_modifiers.push(key);
            }
            return None;
        }

        if !matches!(event.value(), KEY_PRESSED | KEY_REPEAT) || self.modifier_held() {
            return None;
        }
        key_to_char(key)
    }

    /// True while Ctrl, Alt or Meta is down
    pub fn modifier_held(&self) -> bool {
        !self.held_modifiers.is_empty()
    }
}

/// Character for a letter key
pub fn key_to_char(key: Key) -> Option<char> {
    LETTER_KEYS
        .iter()
        .find(|(candidate, _)| *candidate == key)
        .map(|&(_, c)| c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::{ArmingState, ChannelStore};
    use crate::input::{apply_command, Command, KeySteps};
    use evdev::{AbsoluteAxisType, EventType};

    fn make_key_event(key: Key, value: i32) -> InputEvent {
        InputEvent::new(EventType::KEY, key.code(), value)
    }

    #[test]
    fn test_key_to_char_letters() {
        assert_eq!(key_to_char(Key::KEY_W), Some('w'));
        assert_eq!(key_to_char(Key::KEY_A), Some('a'));
        assert_eq!(key_to_char(Key::KEY_Z), Some('z'));
    }

    #[test]
    fn test_key_to_char_non_letters() {
        assert_eq!(key_to_char(Key::KEY_ENTER), None);
        assert_eq!(key_to_char(Key::KEY_1), None);
        assert_eq!(key_to_char(Key::BTN_SOUTH), None);
    }

    #[test]
    fn test_letter_table_is_unique() {
        for (i, (key, c)) in LETTER_KEYS.iter().enumerate() {
            assert_eq!(*c, (b'a' + i as u8) as char);
            assert_eq!(key_to_char(*key), Some(*c));
        }
    }

    fn decode_all(events: &[(Key, i32)]) -> Vec<char> {
        let mut decoder = KeyDecoder::default();
        events
            .iter()
            .filter_map(|&(key, value)| decoder.decode(&make_key_event(key, value)))
            .collect()
    }

    #[test]
    fn test_press_and_repeat_count() {
        assert_eq!(decode_all(&[(Key::KEY_I, KEY_PRESSED)]), vec!['i']);
        assert_eq!(decode_all(&[(Key::KEY_I, KEY_REPEAT)]), vec!['i']);
    }

    #[test]
    fn test_release_is_ignored() {
        assert!(decode_all(&[(Key::KEY_I, KEY_RELEASED)]).is_empty());
    }

    #[test]
    fn test_ctrl_c_chord_is_not_a_key() {
        let keys = decode_all(&[
            (Key::KEY_LEFTCTRL, KEY_PRESSED),
            (Key::KEY_C, KEY_PRESSED),
            (Key::KEY_C, KEY_RELEASED),
            (Key::KEY_LEFTCTRL, KEY_RELEASED),
        ]);
        assert!(keys.is_empty(), "chord decoded as {:?}", keys);
    }

    #[test]
    fn test_ctrl_c_chord_leaves_store_disarmed() {
        let store = ChannelStore::new();
        store.disarm();

        let mut decoder = KeyDecoder::default();
        for (key, value) in [
            (Key::KEY_RIGHTCTRL, KEY_PRESSED),
            (Key::KEY_C, KEY_PRESSED),
            (Key::KEY_C, KEY_REPEAT),
            (Key::KEY_C, KEY_RELEASED),
            (Key::KEY_RIGHTCTRL, KEY_RELEASED),
        ] {
            if let Some(command) = decoder
                .decode(&make_key_event(key, value))
                .and_then(Command::from_key)
            {
                apply_command(&store, command, &KeySteps::default());
            }
        }

        assert_eq!(store.arming_state(), Some(ArmingState::Disarmed));
    }

    #[test]
    fn test_alt_chord_is_not_a_key() {
        let keys = decode_all(&[
            (Key::KEY_LEFTALT, KEY_PRESSED),
            (Key::KEY_V, KEY_PRESSED),
            (Key::KEY_V, KEY_RELEASED),
        ]);
        assert!(keys.is_empty());
    }

    #[test]
    fn test_letters_work_again_after_modifier_release() {
        let keys = decode_all(&[
            (Key::KEY_LEFTCTRL, KEY_PRESSED),
            (Key::KEY_C, KEY_PRESSED),
            (Key::KEY_LEFTCTRL, KEY_RELEASED),
            (Key::KEY_W, KEY_PRESSED),
        ]);
        assert_eq!(keys, vec!['w']);
    }

    #[test]
    fn test_both_ctrl_keys_must_be_released() {
        let mut decoder = KeyDecoder::default();
        decoder.decode(&make_key_event(Key::KEY_LEFTCTRL, KEY_PRESSED));
        decoder.decode(&make_key_event(Key::KEY_RIGHTCTRL, KEY_PRESSED));
        decoder.decode(&make_key_event(Key::KEY_LEFTCTRL, KEY_RELEASED));
        assert!(decoder.modifier_held());

        decoder.decode(&make_key_event(Key::KEY_RIGHTCTRL, KEY_RELEASED));
        assert!(!decoder.modifier_held());
    }

    #[test]
    fn test_non_key_events_ignored() {
        let mut decoder = KeyDecoder::default();

        let abs = InputEvent::new(EventType::ABSOLUTE, AbsoluteAxisType::ABS_X.0, 1);
        assert_eq!(decoder.decode(&abs), None);

        let sync = InputEvent::new(EventType::SYNCHRONIZATION, 0, 0);
        assert_eq!(decoder.decode(&sync), None);
    }

    #[test]
    fn test_open_missing_device() {
        let result = EvdevKeyboard::open("/dev/input/nonexistent_event_12345");
        match result {
            Err(SumdBridgeError::Input(msg)) => {
                assert!(msg.contains("/dev/input/nonexistent_event_12345"));
            }
            Err(other) => panic!("Expected Input error, got: {:?}", other),
            Ok(_) => panic!("Expected Input error, device opened"),
        }
    }

    // Integration test - only runs with a real keyboard
    #[test]
    #[ignore]
    fn test_read_key_with_real_hardware() {
        let path = std::env::var("SUMD_KEYBOARD").unwrap_or_else(|_| "/dev/input/event0".into());
        let mut keyboard = EvdevKeyboard::open(&path).expect("Keyboard not found");

        println!("Press a letter key...");
        let key = keyboard.next_key().unwrap();
        assert!(key.is_some());
    }
}
