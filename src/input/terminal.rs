//! # Raw Terminal Key Source
//!
//! Reads single keystrokes from an interactive terminal without waiting for
//! Enter. [`RawModeGuard`] switches the terminal to raw mode and puts the
//! saved settings back when dropped.
//!
//! In raw mode the terminal no longer turns Ctrl+C into SIGINT, so the
//! interrupt and end-of-file control bytes are read here and end the input.

use std::io::{self, Read, Stdin};

use nix::sys::termios::{self, SetArg, Termios};
use tracing::debug;

use crate::error::{Result, SumdBridgeError};

use super::KeySource;

/// Ctrl+C
const ETX: u8 = 0x03;

/// Ctrl+D
const EOT: u8 = 0x04;

/// Key source reading one byte per key press
pub struct RawKeys<R> {
    reader: R,
}

impl RawKeys<Stdin> {
    /// Read keys from the process's standard input
    ///
    /// Pair with a [`RawModeGuard`], otherwise the terminal still buffers lines.
    pub fn stdin() -> Self {
        Self::from_reader(io::stdin())
    }
}

impl<R: Read> RawKeys<R> {
    pub fn from_reader(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: Read + Send> KeySource for RawKeys<R> {
    fn next_key(&mut self) -> Result<Option<char>> {
        let mut byte = [0u8; 1];
        loop {
            match self.reader.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => {}
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Err(SumdBridgeError::Input(format!("Failed to read keys: {}", e)))
                }
            }

            match byte[0] {
                ETX | EOT => {
                    debug!("Interrupt byte {:#04x} on terminal", byte[0]);
                    return Ok(None);
                }
                b if b.is_ascii_graphic() => return Ok(Some(b as char)),
                // Enter, space, escape sequences and multi-byte characters
                _ => continue,
            }
        }
    }
}

/// Keeps stdin in raw mode while alive
#[derive(Debug)]
pub struct RawModeGuard {
    saved: Termios,
}

impl RawModeGuard {
    /// Put the terminal on stdin into raw mode
    ///
    /// Output post-processing stays on so log lines still start at column 0.
    ///
    /// # Errors
    ///
    /// Returns `Input` if stdin is not a terminal or cannot be reconfigured
    pub fn enable() -> Result<Self> {
        let stdin = io::stdin();
        let saved = termios::tcgetattr(&stdin).map_err(|e| {
            SumdBridgeError::Input(format!("Failed to read terminal settings: {}", e))
        })?;

        let mut raw = saved.clone();
        termios::cfmakeraw(&mut raw);
        raw.output_flags = saved.output_flags;

        termios::tcsetattr(&stdin, SetArg::TCSADRAIN, &raw)
            .map_err(|e| SumdBridgeError::Input(format!("Failed to enter raw mode: {}", e)))?;

        debug!("Terminal switched to raw mode");
        Ok(Self { saved })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(e) = termios::tcsetattr(io::stdin(), SetArg::TCSADRAIN, &self.saved) {
            debug!("Failed to restore terminal settings: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::{ArmingState, ChannelStore};
    use crate::input::{run_input_loop, InputGate, KeySteps};
    use std::io::Cursor;

    fn drain(source: &mut impl KeySource) -> Vec<char> {
        let mut keys = Vec::new();
        while let Some(key) = source.next_key().unwrap() {
            keys.push(key);
        }
        keys
    }

    #[test]
    fn test_each_byte_is_a_key_without_enter() {
        let mut source = RawKeys::from_reader(Cursor::new(b"vw".to_vec()));
        assert_eq!(source.next_key().unwrap(), Some('v'));
        assert_eq!(source.next_key().unwrap(), Some('w'));
        assert_eq!(source.next_key().unwrap(), None);
    }

    #[test]
    fn test_ctrl_c_byte_ends_input() {
        let mut source = RawKeys::from_reader(Cursor::new(vec![b'w', ETX, b'v']));
        assert_eq!(drain(&mut source), vec!['w']);
    }

    #[test]
    fn test_ctrl_d_byte_ends_input() {
        let mut source = RawKeys::from_reader(Cursor::new(vec![b'i', EOT]));
        assert_eq!(drain(&mut source), vec!['i']);
    }

    #[test]
    fn test_control_and_non_ascii_bytes_skipped() {
        let bytes = vec![b'\r', b'\n', b' ', 0x1B, b'[', 0xC3, 0xA9, b'a'];
        let mut source = RawKeys::from_reader(Cursor::new(bytes));
        assert_eq!(drain(&mut source), vec!['[', 'a']);
    }

    #[test]
    fn test_keeps_case() {
        let mut source = RawKeys::from_reader(Cursor::new(b"Wx".to_vec()));
        assert_eq!(drain(&mut source), vec!['W', 'x']);
    }

    #[test]
    fn test_ctrl_c_on_terminal_disarms() {
        let store = ChannelStore::new();
        let mut source = RawKeys::from_reader(Cursor::new(vec![b'v', b'i', ETX, b'c']));

        run_input_loop(&mut source, &store, &KeySteps::default(), &InputGate::new()).unwrap();

        assert_eq!(store.snapshot().throttle, 1060);
        assert_eq!(store.arming_state(), Some(ArmingState::Disarmed));
    }

    #[test]
    fn test_enable_fails_without_terminal() {
        // Test harnesses usually run with stdin redirected
        if std::io::IsTerminal::is_terminal(&io::stdin()) {
            return;
        }
        assert!(matches!(RawModeGuard::enable(), Err(SumdBridgeError::Input(_))));
    }
}
